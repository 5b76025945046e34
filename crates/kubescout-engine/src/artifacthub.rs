//! Artifact Hub transport
//!
//! Talks to the public Artifact Hub REST API:
//! - detail: `GET {api}/packages/helm/{repository}/{package}`
//! - search: `GET {api}/packages/search?ts_query_web={query}&kind=0&limit={n}`
//!
//! Every request carries the configured timeout. Nothing is retried or cached.

use async_trait::async_trait;
use kubescout_core::UpstreamCandidate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::ArtifactHubConfig;
use crate::error::{Result, UpstreamError};
use crate::transport::UpstreamTransport;

/// Artifact Hub kind identifier for Helm charts
const HELM_KIND: &str = "0";

/// Search response envelope
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    packages: Vec<PackageSummary>,
}

/// Package summary as returned by both the detail and the search endpoints
#[derive(Debug, Deserialize)]
struct PackageSummary {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    app_version: Option<String>,
    #[serde(default)]
    stars: Option<u64>,
    #[serde(default)]
    deprecated: Option<bool>,
    repository: RepositorySummary,
}

#[derive(Debug, Deserialize)]
struct RepositorySummary {
    name: String,
    #[serde(default)]
    official: Option<bool>,
    #[serde(default)]
    verified_publisher: Option<bool>,
}

/// Artifact Hub client
pub struct ArtifactHubClient {
    client: reqwest::Client,
    api_url: Url,
    web_url: String,
    search_limit: u32,
    timeout: Duration,
}

impl ArtifactHubClient {
    /// Create a client from endpoint settings
    pub fn new(config: &ArtifactHubConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url).map_err(|e| UpstreamError::InvalidUrl {
            url: config.api_url.clone(),
            reason: e.to_string(),
        })?;
        if api_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl {
                url: config.api_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("kubescout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_url,
            web_url: config.web_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit,
            timeout: config.timeout,
        })
    }

    /// Create a client for the public Artifact Hub with default settings
    pub fn public() -> Result<Self> {
        Self::new(&ArtifactHubConfig::default())
    }

    /// API URL with extra path segments (each one percent-encoded)
    fn api_endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn detail_url(&self, repository: &str, package_name: &str) -> Url {
        self.api_endpoint(&["packages", "helm", repository, package_name])
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.api_endpoint(&["packages", "search"]);
        url.query_pairs_mut()
            .append_pair("ts_query_web", query)
            .append_pair("kind", HELM_KIND)
            .append_pair("limit", &self.search_limit.to_string());
        url
    }

    /// Human-facing package page
    fn package_page(&self, repository: &str, package_name: &str) -> String {
        format!("{}/{}/{}", self.web_url, repository, package_name)
    }

    fn request_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            e.into()
        }
    }

    /// GET a URL and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(url = %url, "artifact hub request");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            return Err(UpstreamError::RateLimited { retry_after });
        }

        if !status.is_success() {
            return Err(UpstreamError::HttpError {
                status: status.as_u16(),
                message: format!("Request to {} failed", url),
            });
        }

        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn candidate_from(&self, summary: PackageSummary) -> UpstreamCandidate {
        let url = self.package_page(&summary.repository.name, &summary.name);
        UpstreamCandidate {
            url,
            name: summary.name,
            repository: summary.repository.name,
            version: summary.version.unwrap_or_default(),
            app_version: summary.app_version.unwrap_or_default(),
            stars: summary.stars.unwrap_or_default(),
            official: summary.repository.official.unwrap_or_default(),
            verified_publisher: summary.repository.verified_publisher.unwrap_or_default(),
            deprecated: summary.deprecated.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl UpstreamTransport for ArtifactHubClient {
    async fn fetch_package_detail(
        &self,
        repository: &str,
        package_name: &str,
    ) -> Result<UpstreamCandidate> {
        let summary: PackageSummary = self
            .get_json(self.detail_url(repository, package_name))
            .await?;
        Ok(self.candidate_from(summary))
    }

    async fn search_packages(&self, query: &str) -> Result<Vec<UpstreamCandidate>> {
        let response: SearchResponse = self.get_json(self.search_url(query)).await?;
        Ok(response
            .packages
            .into_iter()
            .map(|summary| self.candidate_from(summary))
            .collect())
    }
}
