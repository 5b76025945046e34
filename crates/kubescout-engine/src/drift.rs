//! Concurrent drift computation
//!
//! One resolution unit per release, all polled together, joined once. Each
//! unit owns exactly one pre-allocated result slot, so the output is
//! index-aligned with the input no matter which lookup finishes first, and
//! the result list needs no locking.
//!
//! The returned future is `Send`, so it can be driven from `tokio::spawn` or
//! an HTTP handler.

use chrono::Utc;
use futures::future::join_all;
use futures::{FutureExt, StreamExt};
use kubescout_core::{ComparisonResult, DriftReport, Release};
use std::any::Any;
use std::panic::AssertUnwindSafe;

use crate::artifacthub::ArtifactHubClient;
use crate::config::ScoutConfig;
use crate::error::Result;
use crate::resolver::UpstreamResolver;
use crate::transport::UpstreamTransport;

/// Computes drift for a list of releases
pub struct DriftOrchestrator<T> {
    resolver: UpstreamResolver<T>,
    max_concurrency: Option<usize>,
}

impl DriftOrchestrator<ArtifactHubClient> {
    /// Build an Artifact Hub backed orchestrator from configuration
    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        config.validate()?;
        let client = ArtifactHubClient::new(&config.artifact_hub)?;
        let resolver = UpstreamResolver::new(client, config.preset_table());
        Ok(Self::new(resolver).with_max_concurrency(config.max_concurrency))
    }
}

impl<T: UpstreamTransport> DriftOrchestrator<T> {
    /// Unbounded fan-out over `resolver`
    pub fn new(resolver: UpstreamResolver<T>) -> Self {
        Self {
            resolver,
            max_concurrency: None,
        }
    }

    /// Cap the number of lookups in flight (`None` = one per release)
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.map(|n| n.max(1));
        self
    }

    pub fn resolver(&self) -> &UpstreamResolver<T> {
        &self.resolver
    }

    /// Compare every release against its latest upstream version
    ///
    /// Always returns one result per release, in input order. A release whose
    /// upstream lookup fails (or panics) stays `Unknown`; the failure is logged
    /// and does not affect any other release.
    pub async fn compute_drift(&self, releases: &[Release]) -> Vec<ComparisonResult> {
        let mut results: Vec<ComparisonResult> = releases
            .iter()
            .cloned()
            .map(ComparisonResult::unresolved)
            .collect();

        // Collected up front: a lazy `Map` held across the await below would
        // make this future !Send.
        let units: Vec<_> = results
            .iter_mut()
            .map(|slot| self.check_release(slot))
            .collect();
        match self.max_concurrency {
            None => {
                join_all(units).await;
            }
            Some(limit) => {
                futures::stream::iter(units)
                    .buffer_unordered(limit)
                    .for_each(|()| futures::future::ready(()))
                    .await;
            }
        }

        let report = DriftReport::from_results(&results);
        tracing::info!(
            releases = report.total,
            sync = report.sync,
            patch = report.patch,
            minor = report.minor,
            major = report.major,
            unknown = report.unknown,
            "drift check complete"
        );

        results
    }

    /// Resolve one release into its own slot
    async fn check_release(&self, slot: &mut ComparisonResult) {
        let lookup = AssertUnwindSafe(self.resolver.resolve(&slot.release.chart_name))
            .catch_unwind()
            .await;

        match lookup {
            Ok(Ok(upstream)) => slot.apply(&upstream),
            Ok(Err(e)) => {
                tracing::warn!(
                    release = %slot.release.name,
                    namespace = %slot.release.namespace,
                    chart = %slot.release.chart_name,
                    error = %e,
                    "failed to check upstream"
                );
            }
            Err(payload) => {
                tracing::warn!(
                    release = %slot.release.name,
                    namespace = %slot.release.namespace,
                    chart = %slot.release.chart_name,
                    panic = panic_message(payload.as_ref()),
                    "upstream lookup panicked"
                );
            }
        }
        slot.checked_at = Utc::now();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{CallCounts, MockTransport};
    use crate::presets::PresetTable;
    use async_trait::async_trait;
    use kubescout_core::{DriftStatus, UpstreamCandidate};
    use std::future::Future;
    use std::sync::Arc;
    use std::time::Duration;

    /// Delegates to a mock but panics when searching for one chart
    struct PanicsOn {
        inner: MockTransport,
        chart: &'static str,
    }

    #[async_trait]
    impl UpstreamTransport for PanicsOn {
        async fn fetch_package_detail(
            &self,
            repository: &str,
            package_name: &str,
        ) -> Result<UpstreamCandidate> {
            self.inner.fetch_package_detail(repository, package_name).await
        }

        async fn search_packages(&self, query: &str) -> Result<Vec<UpstreamCandidate>> {
            if query == self.chart {
                panic!("transport blew up on {}", query);
            }
            self.inner.search_packages(query).await
        }
    }

    fn assert_send<F: Future + Send>(_: F) {}

    fn release(name: &str, chart: &str, version: &str) -> Release {
        Release::new(name, "default", chart, version)
    }

    fn search_hit(chart: &str, version: &str) -> Vec<UpstreamCandidate> {
        vec![
            UpstreamCandidate::new(chart, "upstream", version)
                .official()
                .with_url(format!("https://artifacthub.io/packages/helm/upstream/{}", chart)),
        ]
    }

    fn orchestrator(mock: MockTransport) -> DriftOrchestrator<MockTransport> {
        DriftOrchestrator::new(UpstreamResolver::new(mock, PresetTable::builtin()))
    }

    #[tokio::test]
    async fn test_results_follow_input_order() {
        let mock = MockTransport::new()
            .with_search("alpha", search_hit("alpha", "2.0.0"))
            .with_search("beta", search_hit("beta", "1.1.0"))
            .with_search("gamma", search_hit("gamma", "1.0.1"))
            // First release finishes last
            .delay_for("alpha", Duration::from_millis(80))
            .delay_for("beta", Duration::from_millis(40));
        let releases = vec![
            release("a", "alpha", "1.0.0"),
            release("b", "beta", "1.0.0"),
            release("c", "gamma", "1.0.0"),
        ];

        let results = orchestrator(mock).compute_drift(&releases).await;

        assert_eq!(results.len(), 3);
        for (result, release) in results.iter().zip(&releases) {
            assert_eq!(&result.release, release);
        }
        assert_eq!(results[0].status, DriftStatus::MajorDrift);
        assert_eq!(results[1].status, DriftStatus::MinorDrift);
        assert_eq!(results[2].status, DriftStatus::PatchDrift);
    }

    #[tokio::test]
    async fn test_one_failure_is_isolated() {
        let mock = MockTransport::new()
            .with_search("alpha", search_hit("alpha", "1.2.0"))
            .with_search("gamma", search_hit("gamma", "1.0.0"))
            .fail_for("X");
        let releases = vec![
            release("a", "alpha", "1.0.0"),
            release("x", "X", "1.0.0"),
            release("c", "gamma", "1.0.0"),
        ];

        let results = orchestrator(mock).compute_drift(&releases).await;

        assert_eq!(results[1].status, DriftStatus::Unknown);
        assert!(results[1].latest_version.is_empty());
        assert!(results[1].upstream_url.is_empty());

        assert_eq!(results[0].status, DriftStatus::MinorDrift);
        assert_eq!(results[0].latest_version, "1.2.0");
        assert_eq!(results[2].status, DriftStatus::Sync);
        assert_eq!(
            results[2].upstream_url,
            "https://artifacthub.io/packages/helm/upstream/gamma"
        );
    }

    #[tokio::test]
    async fn test_all_failures_still_fill_every_slot() {
        let mock = MockTransport::new().fail_for("a").fail_for("b");
        let releases = vec![
            release("r1", "a", "1.0.0"),
            release("r2", "b", "1.0.0"),
            release("r3", "not-published", "1.0.0"),
        ];

        let results = orchestrator(mock).compute_drift(&releases).await;

        assert_eq!(results.len(), releases.len());
        assert!(results.iter().all(|r| r.status == DriftStatus::Unknown));
        assert_eq!(results[2].release.name, "r3");
    }

    #[tokio::test]
    async fn test_empty_input() {
        let results = orchestrator(MockTransport::new()).compute_drift(&[]).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_upstream_version_is_unknown() {
        let mock = MockTransport::new().with_search("odd", search_hit("odd", "nightly"));
        let results = orchestrator(mock)
            .compute_drift(&[release("o", "odd", "1.0.0")])
            .await;

        assert_eq!(results[0].status, DriftStatus::Unknown);
        assert_eq!(results[0].latest_version, "nightly");
    }

    #[tokio::test]
    async fn test_presets_and_search_mixed() {
        let mock = MockTransport::new()
            .with_detail(UpstreamCandidate::new("argo-cd", "argo", "7.0.0"))
            .with_search("redis", search_hit("redis", "19.0.0"));
        let releases = vec![
            release("argocd", "argo-cd", "v7.0.0"),
            release("cache", "redis", "18.4.0"),
        ];

        let orchestrator = orchestrator(mock.clone());
        let results = orchestrator.compute_drift(&releases).await;

        assert_eq!(results[0].status, DriftStatus::Sync);
        assert_eq!(results[1].status, DriftStatus::MajorDrift);
        assert_eq!(mock.call_counts(), CallCounts { details: 1, searches: 1 });
    }

    #[tokio::test]
    async fn test_bounded_concurrency_keeps_order() {
        let mut mock = MockTransport::new();
        let mut releases = Vec::new();
        for i in 0..10 {
            let chart = format!("chart-{}", i);
            mock = mock
                .with_search(chart.clone(), search_hit(&chart, &format!("1.{}.0", i)))
                .delay_for(chart.clone(), Duration::from_millis(10 * (10 - i)));
            releases.push(release(&format!("r{}", i), &chart, "1.0.0"));
        }

        let results = orchestrator(mock)
            .with_max_concurrency(Some(3))
            .compute_drift(&releases)
            .await;

        assert_eq!(results.len(), 10);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.release.name, format!("r{}", i));
            assert_eq!(result.latest_version, format!("1.{}.0", i));
        }
        assert_eq!(results[0].status, DriftStatus::Sync);
        assert_eq!(results[9].status, DriftStatus::MinorDrift);
    }

    #[tokio::test]
    async fn test_checked_at_is_stamped_after_lookup() {
        let mock = MockTransport::new()
            .with_search("slow", search_hit("slow", "1.0.0"))
            .delay_for("slow", Duration::from_millis(20));
        let before = Utc::now();

        let results = orchestrator(mock)
            .compute_drift(&[release("s", "slow", "1.0.0")])
            .await;

        assert!(results[0].checked_at >= before + chrono::TimeDelta::milliseconds(20));
    }

    #[tokio::test]
    async fn test_panicking_lookup_is_isolated() {
        let inner = MockTransport::new()
            .with_search("alpha", search_hit("alpha", "1.1.0"))
            .with_search("gamma", search_hit("gamma", "1.0.0"));
        let transport = PanicsOn { inner, chart: "X" };
        let orchestrator =
            DriftOrchestrator::new(UpstreamResolver::new(transport, PresetTable::builtin()));
        let releases = vec![
            release("a", "alpha", "1.0.0"),
            release("x", "X", "1.0.0"),
            release("c", "gamma", "1.0.0"),
        ];

        let results = orchestrator.compute_drift(&releases).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, DriftStatus::MinorDrift);
        assert_eq!(results[1].status, DriftStatus::Unknown);
        assert!(results[1].latest_version.is_empty());
        assert_eq!(results[2].status, DriftStatus::Sync);
    }

    #[tokio::test]
    async fn test_panicking_lookup_is_isolated_when_bounded() {
        let inner = MockTransport::new().with_search("alpha", search_hit("alpha", "2.0.0"));
        let transport = PanicsOn { inner, chart: "X" };
        let orchestrator =
            DriftOrchestrator::new(UpstreamResolver::new(transport, PresetTable::builtin()))
                .with_max_concurrency(Some(1));

        let results = orchestrator
            .compute_drift(&[release("x", "X", "1.0.0"), release("a", "alpha", "1.0.0")])
            .await;

        assert_eq!(results[0].status, DriftStatus::Unknown);
        assert_eq!(results[1].status, DriftStatus::MajorDrift);
    }

    #[test]
    fn test_compute_drift_future_is_send() {
        let orchestrator = orchestrator(MockTransport::new());
        let releases = vec![release("a", "alpha", "1.0.0")];

        assert_send(orchestrator.compute_drift(&releases));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_runs_on_spawned_task() {
        let mock = MockTransport::new()
            .with_search("alpha", search_hit("alpha", "1.1.0"))
            .with_search("beta", search_hit("beta", "1.0.0"));
        let orchestrator = Arc::new(orchestrator(mock).with_max_concurrency(Some(2)));
        let releases = vec![release("a", "alpha", "1.0.0"), release("b", "beta", "1.0.0")];

        let handle = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.compute_drift(&releases).await })
        };
        let results = handle.await.unwrap();

        assert_eq!(results[0].status, DriftStatus::MinorDrift);
        assert_eq!(results[1].status, DriftStatus::Sync);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let orchestrator = orchestrator(MockTransport::new()).with_max_concurrency(Some(0));
        assert_eq!(orchestrator.max_concurrency, Some(1));
    }
}
