//! Mock release source for testing
//!
//! Serves a fixed release list (or a fixed failure) without a cluster.

use async_trait::async_trait;
use kubescout_core::Release;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{KubeError, Result};
use crate::source::ReleaseSource;

/// In-memory release source for testing
#[derive(Clone, Default)]
pub struct MockReleaseSource {
    releases: Vec<Release>,
    failure: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockReleaseSource {
    /// Serve `releases` as-is
    pub fn with_releases(releases: Vec<Release>) -> Self {
        Self {
            releases,
            ..Default::default()
        }
    }

    /// Fail every listing with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Number of times the list was requested
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseSource for MockReleaseSource {
    async fn list_releases(&self) -> Result<Vec<Release>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(KubeError::Unavailable(message.clone())),
            None => Ok(self.releases.clone()),
        }
    }
}
