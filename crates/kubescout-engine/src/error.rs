//! Error types for upstream resolution

use thiserror::Error;

/// Upstream lookup errors
///
/// All of these are per-release failures: the drift orchestrator downgrades
/// them to an `Unknown` result and never propagates them further.
#[derive(Debug, Error)]
pub enum UpstreamError {
    // ============ Lookup Errors ============
    #[error("Package not found upstream: {chart}")]
    PackageNotFound { chart: String },

    // ============ Network Errors ============
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Rate limited by server. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    // ============ Decoding Errors ============
    #[error("Failed to decode upstream response from {url}: {message}")]
    Decode { url: String, message: String },

    // ============ Configuration Errors ============
    #[error("Invalid upstream URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for upstream operations
pub type Result<T> = std::result::Result<T, UpstreamError>;

impl UpstreamError {
    /// True when the package simply does not exist upstream
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PackageNotFound { .. } | Self::HttpError { status: 404, .. })
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            UpstreamError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else if e.is_decode() {
            UpstreamError::Decode {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                message: e.to_string(),
            }
        } else if let Some(status) = e.status() {
            UpstreamError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            UpstreamError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_yaml::Error> for UpstreamError {
    fn from(e: serde_yaml::Error) -> Self {
        UpstreamError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(e: serde_json::Error) -> Self {
        UpstreamError::Serialization(e.to_string())
    }
}

impl From<url::ParseError> for UpstreamError {
    fn from(e: url::ParseError) -> Self {
        UpstreamError::InvalidUrl {
            url: String::new(),
            reason: e.to_string(),
        }
    }
}
