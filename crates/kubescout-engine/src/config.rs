//! KubeScout configuration
//!
//! Stored in `~/.config/kubescout/config.yaml`. Every field is optional; a
//! missing file means defaults everywhere.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, UpstreamError};
use crate::presets::{Preset, PresetTable};

pub const DEFAULT_API_URL: &str = "https://artifacthub.io/api/v1";
pub const DEFAULT_WEB_URL: &str = "https://artifacthub.io/packages/helm";
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
/// Artifact Hub rejects search pages larger than this
pub const MAX_SEARCH_LIMIT: u32 = 60;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutConfig {
    /// Artifact Hub endpoint settings
    #[serde(default)]
    pub artifact_hub: ArtifactHubConfig,

    /// Upper bound on concurrent lookups (unbounded when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,

    /// Extra presets, layered over the built-in ones
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub presets: BTreeMap<String, Preset>,
}

/// Artifact Hub endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactHubConfig {
    /// Base URL of the REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the package pages, used for links
    #[serde(default = "default_web_url")]
    pub web_url: String,

    /// Number of search results requested per lookup
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Timeout of each individual request
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_web_url() -> String {
    DEFAULT_WEB_URL.to_string()
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for ArtifactHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            web_url: default_web_url(),
            search_limit: default_search_limit(),
            timeout: default_timeout(),
        }
    }
}

impl ScoutConfig {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| UpstreamError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("kubescout").join("config.yaml"))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let hub = &self.artifact_hub;
        if hub.search_limit == 0 || hub.search_limit > MAX_SEARCH_LIMIT {
            return Err(UpstreamError::InvalidConfig {
                message: format!(
                    "artifactHub.searchLimit must be between 1 and {}, got {}",
                    MAX_SEARCH_LIMIT, hub.search_limit
                ),
            });
        }
        if hub.timeout.is_zero() {
            return Err(UpstreamError::InvalidConfig {
                message: "artifactHub.timeout must be greater than zero".to_string(),
            });
        }
        if self.max_concurrency == Some(0) {
            return Err(UpstreamError::InvalidConfig {
                message: "maxConcurrency must be at least 1".to_string(),
            });
        }
        for (chart, preset) in &self.presets {
            if preset.repository.is_empty() || preset.package.is_empty() {
                return Err(UpstreamError::InvalidConfig {
                    message: format!("preset '{}' needs both repository and package", chart),
                });
            }
        }
        url::Url::parse(&hub.api_url).map_err(|e| UpstreamError::InvalidUrl {
            url: hub.api_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Built-in presets with the configured ones layered on top
    pub fn preset_table(&self) -> PresetTable {
        PresetTable::builtin().with_overrides(self.presets.clone())
    }
}
