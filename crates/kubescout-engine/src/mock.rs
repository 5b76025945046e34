//! Mock transport for testing
//!
//! Serves canned package details and search results from memory and records
//! every call, so tests can assert on the shape of the lookups.

use async_trait::async_trait;
use kubescout_core::UpstreamCandidate;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::{Result, UpstreamError};
use crate::transport::UpstreamTransport;

/// One recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Detail { repository: String, package: String },
    Search { query: String },
}

/// Counts of calls performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallCounts {
    pub details: usize,
    pub searches: usize,
}

#[derive(Default)]
struct MockState {
    details: HashMap<(String, String), UpstreamCandidate>,
    searches: HashMap<String, Vec<UpstreamCandidate>>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Vec<TransportCall>,
}

/// In-memory upstream transport for testing
///
/// Unknown details answer with HTTP 404, unknown searches with no results.
/// A name registered with [`MockTransport::fail_for`] fails with a network
/// error, whether it is looked up as a package or as a search query.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve `candidate` from the detail endpoint under its repository and name
    pub fn with_detail(self, candidate: UpstreamCandidate) -> Self {
        self.state()
            .details
            .insert((candidate.repository.clone(), candidate.name.clone()), candidate);
        self
    }

    /// Serve `candidates` for a search query
    pub fn with_search(self, query: impl Into<String>, candidates: Vec<UpstreamCandidate>) -> Self {
        self.state().searches.insert(query.into(), candidates);
        self
    }

    /// Fail every lookup of `name`
    pub fn fail_for(self, name: impl Into<String>) -> Self {
        self.state().failing.insert(name.into());
        self
    }

    /// Delay every lookup of `name`
    pub fn delay_for(self, name: impl Into<String>, delay: Duration) -> Self {
        self.state().delays.insert(name.into(), delay);
        self
    }

    /// All calls in the order they were made
    pub fn calls(&self) -> Vec<TransportCall> {
        self.state().calls.clone()
    }

    /// Get call counts for assertions
    pub fn call_counts(&self) -> CallCounts {
        let state = self.state();
        let mut counts = CallCounts::default();
        for call in &state.calls {
            match call {
                TransportCall::Detail { .. } => counts.details += 1,
                TransportCall::Search { .. } => counts.searches += 1,
            }
        }
        counts
    }

    /// Reset recorded calls
    pub fn reset_calls(&self) {
        self.state().calls.clear();
    }

    /// Record the call and apply configured delay / failure for `name`
    async fn begin(&self, call: TransportCall, name: &str) -> Result<()> {
        let (delay, failing) = {
            let mut state = self.state();
            state.calls.push(call);
            (state.delays.get(name).copied(), state.failing.contains(name))
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if failing {
            return Err(UpstreamError::NetworkError {
                message: format!("Connection failed: mock failure for {}", name),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UpstreamTransport for MockTransport {
    async fn fetch_package_detail(
        &self,
        repository: &str,
        package_name: &str,
    ) -> Result<UpstreamCandidate> {
        let call = TransportCall::Detail {
            repository: repository.to_string(),
            package: package_name.to_string(),
        };
        self.begin(call, package_name).await?;

        self.state()
            .details
            .get(&(repository.to_string(), package_name.to_string()))
            .cloned()
            .ok_or_else(|| UpstreamError::HttpError {
                status: 404,
                message: format!("{}/{} not found", repository, package_name),
            })
    }

    async fn search_packages(&self, query: &str) -> Result<Vec<UpstreamCandidate>> {
        let call = TransportCall::Search {
            query: query.to_string(),
        };
        self.begin(call, query).await?;

        Ok(self.state().searches.get(query).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls() {
        let mock = MockTransport::new()
            .with_detail(UpstreamCandidate::new("keda", "kedacore", "2.0.0"))
            .with_search("redis", vec![UpstreamCandidate::new("redis", "bitnami", "19.0.0")]);

        mock.fetch_package_detail("kedacore", "keda").await.unwrap();
        mock.search_packages("redis").await.unwrap();
        mock.search_packages("unknown").await.unwrap();

        assert_eq!(mock.call_counts(), CallCounts { details: 1, searches: 2 });
        assert_eq!(
            mock.calls()[0],
            TransportCall::Detail {
                repository: "kedacore".to_string(),
                package: "keda".to_string()
            }
        );

        mock.reset_calls();
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_detail_is_404() {
        let mock = MockTransport::new();
        let err = mock.fetch_package_detail("a", "b").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let mock = MockTransport::new().fail_for("broken");
        assert!(mock.search_packages("broken").await.is_err());
        assert!(mock.search_packages("fine").await.unwrap().is_empty());
    }
}
