//! Upstream transport trait
//!
//! The resolver only ranks and maps decoded package summaries; fetching and
//! decoding them is the transport's job.

use async_trait::async_trait;
use kubescout_core::UpstreamCandidate;
use std::sync::Arc;

use crate::error::Result;

/// Access to an upstream package registry
///
/// Implementations must be safe to call from many resolution units at once.
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Fetch one exact package from a known repository
    async fn fetch_package_detail(
        &self,
        repository: &str,
        package_name: &str,
    ) -> Result<UpstreamCandidate>;

    /// Search packages by raw chart name
    ///
    /// URL-encoding the query and bounding the result count are up to the
    /// implementation.
    async fn search_packages(&self, query: &str) -> Result<Vec<UpstreamCandidate>>;
}

#[async_trait]
impl<T: UpstreamTransport + ?Sized> UpstreamTransport for Arc<T> {
    async fn fetch_package_detail(
        &self,
        repository: &str,
        package_name: &str,
    ) -> Result<UpstreamCandidate> {
        (**self).fetch_package_detail(repository, package_name).await
    }

    async fn search_packages(&self, query: &str) -> Result<Vec<UpstreamCandidate>> {
        (**self).search_packages(query).await
    }
}
