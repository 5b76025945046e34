//! Error types for kubescout-kube

use thiserror::Error;

/// Result type for kubescout-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur while enumerating releases
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// HELM_DRIVER names a backend we cannot read
    #[error("unsupported Helm storage driver '{driver}'\nHint: use 'secret' or 'configmap'")]
    UnsupportedDriver { driver: String },

    /// A Helm release record could not be decoded
    #[error("invalid release record '{name}': {message}")]
    InvalidRecord { name: String, message: String },

    /// Release listing is unavailable
    #[error("release listing unavailable: {0}")]
    Unavailable(String),
}

impl KubeError {
    pub(crate) fn invalid_record(name: &str, message: impl Into<String>) -> Self {
        KubeError::InvalidRecord {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Check if this is a Kubernetes 403 Forbidden error
    pub fn is_forbidden(&self) -> bool {
        matches!(self, KubeError::Api(kube::Error::Api(resp)) if resp.code == 403)
    }
}
