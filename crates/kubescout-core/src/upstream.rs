//! Upstream package observations and resolution results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One published package observed upstream
///
/// Produced transiently while resolving a chart name; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamCandidate {
    /// Package name
    pub name: String,

    /// Publisher repository name
    pub repository: String,

    /// Published chart version
    pub version: String,

    /// Published application version
    #[serde(default)]
    pub app_version: String,

    /// Star count
    #[serde(default)]
    pub stars: u64,

    /// Repository is flagged official
    #[serde(default)]
    pub official: bool,

    /// Repository publisher is verified
    #[serde(default)]
    pub verified_publisher: bool,

    /// Package is deprecated
    #[serde(default)]
    pub deprecated: bool,

    /// Canonical detail page
    #[serde(default)]
    pub url: String,
}

impl UpstreamCandidate {
    /// Create a candidate with only identity and version set
    pub fn new(
        name: impl Into<String>,
        repository: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            repository: repository.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = app_version.into();
        self
    }

    pub fn with_stars(mut self, stars: u64) -> Self {
        self.stars = stars;
        self
    }

    pub fn official(mut self) -> Self {
        self.official = true;
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified_publisher = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Which lookup tier produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    /// Curated preset, fetched directly
    Preset,
    /// Search results ranked by the candidate ranker
    Search,
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preset => write!(f, "preset"),
            Self::Search => write!(f, "search"),
        }
    }
}

/// The winning upstream package for a chart name
///
/// Created fresh on every resolution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUpstream {
    pub latest_version: String,
    pub latest_app_version: String,
    pub url: String,
    /// Repository the winning package was published in
    pub repository: String,
    pub source: ResolutionSource,
    /// Wall-clock time the resolution completed
    pub resolved_at: DateTime<Utc>,
}

impl ResolvedUpstream {
    /// Build from the winning candidate, stamped with the current time
    pub fn from_candidate(candidate: &UpstreamCandidate, source: ResolutionSource) -> Self {
        Self {
            latest_version: candidate.version.clone(),
            latest_app_version: candidate.app_version.clone(),
            url: candidate.url.clone(),
            repository: candidate.repository.clone(),
            source,
            resolved_at: Utc::now(),
        }
    }
}
