//! Check command - compare deployed releases against their upstream charts

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use kubescout_core::{ComparisonResult, DriftReport, DriftStatus};
use kubescout_engine::{DriftOrchestrator, ScoutConfig, UpstreamTransport};
use kubescout_kube::{HelmDriver, HelmReleaseSource, ReleaseSource};
use std::time::Duration;

use crate::display;
use crate::error::{CliError, Result};

/// Options for `kubescout check`
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Restrict listing to one namespace; `None` lists all namespaces
    pub namespace: Option<String>,
    pub json: bool,
    pub fail_on: Option<DriftStatus>,
    pub max_concurrency: Option<usize>,
    pub timeout: Option<Duration>,
}

pub async fn run(mut config: ScoutConfig, opts: CheckOptions) -> Result<()> {
    if let Some(limit) = opts.max_concurrency {
        config.max_concurrency = Some(limit);
    }
    if let Some(timeout) = opts.timeout {
        config.artifact_hub.timeout = timeout;
    }

    let driver = HelmDriver::from_env()?;
    let orchestrator = DriftOrchestrator::from_config(&config)?;
    let source = HelmReleaseSource::new(driver, opts.namespace.clone()).await?;

    let spinner = (!opts.json && Term::stderr().is_term()).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Checking releases against Artifact Hub...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let outcome = check(&source, &orchestrator).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let results = outcome?;
    let report = DriftReport::from_results(&results);

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("{}", display::render_summary(&report));
    } else {
        print!("{}", display::render_table(&results));
        println!();
        println!("{}", display::render_summary(&report));
    }

    enforce_threshold(&report, opts.fail_on)
}

/// List releases and compute drift for each
///
/// A listing failure is fatal. Per-release upstream failures are not: those
/// releases come back as `Unknown`.
pub async fn check<S, T>(
    source: &S,
    orchestrator: &DriftOrchestrator<T>,
) -> Result<Vec<ComparisonResult>>
where
    S: ReleaseSource,
    T: UpstreamTransport,
{
    let releases = source.list_releases().await?;
    tracing::debug!(count = releases.len(), "listed deployed releases");
    Ok(orchestrator.compute_drift(&releases).await)
}

/// Fail when any release drifted at or beyond `threshold`
pub fn enforce_threshold(report: &DriftReport, threshold: Option<DriftStatus>) -> Result<()> {
    let Some(threshold) = threshold else {
        return Ok(());
    };
    if !report.has_drift_at_least(threshold) {
        return Ok(());
    }

    let count = [
        (report.patch, DriftStatus::PatchDrift),
        (report.minor, DriftStatus::MinorDrift),
        (report.major, DriftStatus::MajorDrift),
    ]
    .into_iter()
    .filter(|(_, status)| *status >= threshold)
    .map(|(n, _)| n)
    .sum();

    Err(CliError::DriftDetected {
        count,
        threshold: threshold.to_string(),
    })
}

/// Parse a `--fail-on` value
pub fn parse_threshold(value: &str) -> std::result::Result<DriftStatus, String> {
    let status: DriftStatus = value.parse().map_err(|e| format!("{}", e))?;
    if status.is_drift() {
        Ok(status)
    } else {
        Err(format!(
            "'{}' is not a drift level; use patch, minor or major",
            value
        ))
    }
}
