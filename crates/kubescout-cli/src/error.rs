//! CLI error types with exit code handling

use kubescout_engine::UpstreamError;
use kubescout_kube::KubeError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    #[diagnostic(code(kubescout::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Listing releases failed; nothing can be reported
    #[error("Failed to list releases: {message}")]
    #[diagnostic(
        code(kubescout::cli::cluster),
        help("Check your kubeconfig context and permission to list Helm Secrets or ConfigMaps")
    )]
    Cluster { message: String },

    /// A single upstream lookup failed
    #[error("Upstream lookup failed: {message}")]
    #[diagnostic(code(kubescout::cli::upstream))]
    Upstream {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Drift at or above the requested threshold
    #[error("{count} release(s) drifted to {threshold} or worse")]
    #[diagnostic(code(kubescout::cli::drift))]
    DriftDetected { count: usize, threshold: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(kubescout::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Cluster { .. } => exit_codes::CLUSTER_ERROR,
            CliError::Upstream { .. } => exit_codes::UPSTREAM_ERROR,
            CliError::DriftDetected { .. } => exit_codes::DRIFT_DETECTED,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        match err {
            KubeError::UnsupportedDriver { .. } => CliError::Config {
                message: err.to_string(),
                help: Some("Unset HELM_DRIVER or set it to 'secret' or 'configmap'".to_string()),
            },
            other => CliError::Cluster {
                message: other.to_string(),
            },
        }
    }
}

impl From<UpstreamError> for CliError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::InvalidConfig { .. } | UpstreamError::InvalidUrl { .. } => {
                CliError::config(err.to_string())
            }
            UpstreamError::PackageNotFound { ref chart } => CliError::Upstream {
                help: Some(format!(
                    "Pin '{}' to its repository under `presets:` in the config file",
                    chart
                )),
                message: err.to_string(),
            },
            UpstreamError::RateLimited { .. } => CliError::Upstream {
                message: err.to_string(),
                help: Some("Artifact Hub throttles anonymous clients; try again later".to_string()),
            },
            other => CliError::Upstream {
                message: other.to_string(),
                help: None,
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Internal {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
