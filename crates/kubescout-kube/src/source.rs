//! Release enumeration
//!
//! [`HelmReleaseSource`] reads the records Helm keeps in the cluster. It is
//! read-only: nothing here ever writes to the cluster.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::Client;
use kube::api::{Api, ListParams};
use kubescout_core::Release;

use crate::error::{KubeError, Result};
use crate::helm::{self, DEPLOYED_SELECTOR, HELM_RELEASE_TYPE, RELEASE_KEY};

/// Source of installed releases
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// List the currently deployed releases
    async fn list_releases(&self) -> Result<Vec<Release>>;
}

/// Where Helm keeps its release records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HelmDriver {
    /// Secrets (Helm's default)
    #[default]
    Secrets,
    /// ConfigMaps
    ConfigMaps,
}

impl HelmDriver {
    /// Parse a `HELM_DRIVER` value
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "secret" | "secrets" => Ok(Self::Secrets),
            "configmap" | "configmaps" => Ok(Self::ConfigMaps),
            other => Err(KubeError::UnsupportedDriver {
                driver: other.to_string(),
            }),
        }
    }

    /// Read the driver from the `HELM_DRIVER` environment variable
    pub fn from_env() -> Result<Self> {
        match std::env::var("HELM_DRIVER") {
            Ok(value) => Self::parse(&value),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl std::fmt::Display for HelmDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secrets => write!(f, "secret"),
            Self::ConfigMaps => write!(f, "configmap"),
        }
    }
}

/// Lists deployed Helm releases from cluster storage
pub struct HelmReleaseSource {
    client: Client,
    driver: HelmDriver,
    /// `None` lists across all namespaces
    namespace: Option<String>,
}

impl HelmReleaseSource {
    /// Connect using the default kubeconfig / in-cluster configuration
    pub async fn new(driver: HelmDriver, namespace: Option<String>) -> Result<Self> {
        let client = Client::try_default().await?;
        Ok(Self::with_client(client, driver, namespace))
    }

    /// Create with an existing client
    pub fn with_client(client: Client, driver: HelmDriver, namespace: Option<String>) -> Self {
        Self {
            client,
            driver,
            namespace,
        }
    }

    fn api<K>(&self) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        match &self.namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }

    fn list_params() -> ListParams {
        ListParams::default().labels(DEPLOYED_SELECTOR)
    }

    async fn read_secrets(&self) -> Result<Vec<Release>> {
        let secrets = self.api::<Secret>().list(&Self::list_params()).await?;

        let mut releases = Vec::new();
        for secret in &secrets.items {
            if secret.type_.as_deref() != Some(HELM_RELEASE_TYPE) {
                continue;
            }
            let name = secret.metadata.name.as_deref().unwrap_or_default();
            let Some(payload) = secret.data.as_ref().and_then(|d| d.get(RELEASE_KEY)) else {
                tracing::warn!(secret = name, "Helm secret has no release data, skipping");
                continue;
            };
            push_decoded(
                &mut releases,
                helm::decode_release(name, &payload.0, secret.metadata.namespace.as_deref()),
            );
        }
        Ok(releases)
    }

    async fn read_configmaps(&self) -> Result<Vec<Release>> {
        let configmaps = self.api::<ConfigMap>().list(&Self::list_params()).await?;

        let mut releases = Vec::new();
        for configmap in &configmaps.items {
            let name = configmap.metadata.name.as_deref().unwrap_or_default();
            let Some(payload) = configmap.data.as_ref().and_then(|d| d.get(RELEASE_KEY)) else {
                tracing::warn!(configmap = name, "Helm configmap has no release data, skipping");
                continue;
            };
            let namespace = configmap.metadata.namespace.as_deref();
            push_decoded(&mut releases, helm::decode_release(name, payload.as_bytes(), namespace));
        }
        Ok(releases)
    }
}

/// Keep a decoded record; an undecodable one is logged and dropped
fn push_decoded(releases: &mut Vec<Release>, decoded: Result<Release>) {
    match decoded {
        Ok(release) => releases.push(release),
        Err(e) => tracing::warn!(error = %e, "skipping undecodable Helm release record"),
    }
}

#[async_trait]
impl ReleaseSource for HelmReleaseSource {
    async fn list_releases(&self) -> Result<Vec<Release>> {
        let records = match self.driver {
            HelmDriver::Secrets => self.read_secrets().await?,
            HelmDriver::ConfigMaps => self.read_configmaps().await?,
        };

        let releases = helm::latest_per_release(records);
        tracing::info!(
            driver = %self.driver,
            namespace = self.namespace.as_deref().unwrap_or("*"),
            count = releases.len(),
            "listed Helm releases"
        );
        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_parse() {
        assert_eq!(HelmDriver::parse("").unwrap(), HelmDriver::Secrets);
        assert_eq!(HelmDriver::parse("secret").unwrap(), HelmDriver::Secrets);
        assert_eq!(HelmDriver::parse("Secrets").unwrap(), HelmDriver::Secrets);
        assert_eq!(HelmDriver::parse("configmap").unwrap(), HelmDriver::ConfigMaps);
        assert_eq!(HelmDriver::parse(" configmaps ").unwrap(), HelmDriver::ConfigMaps);
    }

    #[test]
    fn test_driver_parse_rejects_unsupported() {
        let err = HelmDriver::parse("sql").unwrap_err();
        assert!(matches!(err, KubeError::UnsupportedDriver { ref driver } if driver == "sql"));
        assert!(HelmDriver::parse("memory").is_err());
    }

    #[test]
    fn test_driver_display_roundtrips() {
        for driver in [HelmDriver::Secrets, HelmDriver::ConfigMaps] {
            assert_eq!(HelmDriver::parse(&driver.to_string()).unwrap(), driver);
        }
    }
}
