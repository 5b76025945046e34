//! Upstream resolution
//!
//! Two tiers:
//! 1. **Preset**: a chart listed in the preset table is fetched directly from
//!    its pinned repository. A failure here is final; search is not tried,
//!    because the preset is authoritative.
//! 2. **Search**: otherwise the registry is searched by chart name and the
//!    results are ranked with [`select_best`].

use kubescout_core::{ResolutionSource, ResolvedUpstream, select_best};
use std::sync::Arc;

use crate::error::{Result, UpstreamError};
use crate::presets::PresetTable;
use crate::transport::UpstreamTransport;

/// Resolves chart names to their latest upstream release
///
/// Holds no mutable state, so one resolver can serve any number of
/// concurrent lookups.
pub struct UpstreamResolver<T> {
    transport: T,
    presets: Arc<PresetTable>,
}

impl<T: UpstreamTransport> UpstreamResolver<T> {
    pub fn new(transport: T, presets: PresetTable) -> Self {
        Self::with_shared_presets(transport, Arc::new(presets))
    }

    pub fn with_shared_presets(transport: T, presets: Arc<PresetTable>) -> Self {
        Self { transport, presets }
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve the latest upstream release of `chart_name`
    pub async fn resolve(&self, chart_name: &str) -> Result<ResolvedUpstream> {
        if chart_name.is_empty() {
            return Err(UpstreamError::PackageNotFound {
                chart: String::new(),
            });
        }

        if let Some(preset) = self.presets.get(chart_name) {
            tracing::debug!(
                chart = chart_name,
                repository = %preset.repository,
                package = %preset.package,
                "resolving via preset"
            );
            let candidate = self
                .transport
                .fetch_package_detail(&preset.repository, &preset.package)
                .await?;
            return Ok(ResolvedUpstream::from_candidate(&candidate, ResolutionSource::Preset));
        }

        let candidates = self.transport.search_packages(chart_name).await?;
        let best =
            select_best(chart_name, &candidates).ok_or_else(|| UpstreamError::PackageNotFound {
                chart: chart_name.to_string(),
            })?;

        tracing::debug!(
            chart = chart_name,
            candidates = candidates.len(),
            repository = %best.repository,
            version = %best.version,
            "resolved via search"
        );
        Ok(ResolvedUpstream::from_candidate(best, ResolutionSource::Search))
    }
}
