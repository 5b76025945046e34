//! Release records as enumerated from the cluster

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deployed Helm release
///
/// Read-only to the drift engine. Version strings are free-form and are not
/// guaranteed to be valid semantic versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release name
    pub name: String,

    /// Kubernetes namespace
    pub namespace: String,

    /// Chart name (never empty)
    pub chart_name: String,

    /// Installed chart version
    pub chart_version: String,

    /// Installed application version
    #[serde(default)]
    pub app_version: String,

    /// Revision number
    pub revision: u32,

    /// Last deployment time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,

    /// Chart icon URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Release {
    /// Create a release with the fields the drift engine needs
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        chart_name: impl Into<String>,
        chart_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            chart_name: chart_name.into(),
            chart_version: chart_version.into(),
            app_version: String::new(),
            revision: 1,
            updated: None,
            icon: None,
        }
    }

    /// Set the application version
    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = app_version.into();
        self
    }

    /// Set the revision number
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// `namespace/name` identifier
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}
