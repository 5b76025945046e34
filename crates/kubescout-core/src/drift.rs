//! Drift status and comparison results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::CoreError;
use crate::release::Release;
use crate::upstream::ResolvedUpstream;

/// Drift severity
///
/// `Sync < PatchDrift < MinorDrift < MajorDrift`. `Unknown` means the
/// comparison was not possible and is unordered against the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftStatus {
    Sync,
    PatchDrift,
    MinorDrift,
    MajorDrift,
    Unknown,
}

impl DriftStatus {
    /// All statuses, least severe first
    pub const ALL: [DriftStatus; 5] = [
        DriftStatus::Sync,
        DriftStatus::PatchDrift,
        DriftStatus::MinorDrift,
        DriftStatus::MajorDrift,
        DriftStatus::Unknown,
    ];

    /// Position on the severity scale, `None` for `Unknown`
    pub fn severity(self) -> Option<u8> {
        match self {
            Self::Sync => Some(0),
            Self::PatchDrift => Some(1),
            Self::MinorDrift => Some(2),
            Self::MajorDrift => Some(3),
            Self::Unknown => None,
        }
    }

    /// Wire token (`SYNC`, `PATCH_DRIFT`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "SYNC",
            Self::PatchDrift => "PATCH_DRIFT",
            Self::MinorDrift => "MINOR_DRIFT",
            Self::MajorDrift => "MAJOR_DRIFT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// True for the three drift levels
    pub fn is_drift(self) -> bool {
        matches!(self, Self::PatchDrift | Self::MinorDrift | Self::MajorDrift)
    }
}

impl PartialOrd for DriftStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.severity(), other.severity()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            (None, None) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl std::fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriftStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "sync" => Ok(Self::Sync),
            "patch" | "patch_drift" => Ok(Self::PatchDrift),
            "minor" | "minor_drift" => Ok(Self::MinorDrift),
            "major" | "major_drift" => Ok(Self::MajorDrift),
            "unknown" => Ok(Self::Unknown),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

/// Drift analysis for one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub release: Release,
    pub latest_version: String,
    pub latest_app_version: String,
    pub status: DriftStatus,
    pub upstream_url: String,
    pub checked_at: DateTime<Utc>,
}

impl ComparisonResult {
    /// A result that has not been resolved yet: `Unknown` with empty upstream fields
    pub fn unresolved(release: Release) -> Self {
        Self {
            release,
            latest_version: String::new(),
            latest_app_version: String::new(),
            status: DriftStatus::Unknown,
            upstream_url: String::new(),
            checked_at: Utc::now(),
        }
    }

    /// Fill in the upstream fields and classify against the installed chart version
    pub fn apply(&mut self, upstream: &ResolvedUpstream) {
        self.latest_version = upstream.latest_version.clone();
        self.latest_app_version = upstream.latest_app_version.clone();
        self.upstream_url = upstream.url.clone();
        self.status =
            crate::version::classify_drift(&self.release.chart_version, &self.latest_version);
    }
}

/// Per-status counts over a set of results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    pub total: usize,
    pub sync: usize,
    pub patch: usize,
    pub minor: usize,
    pub major: usize,
    pub unknown: usize,
}

impl DriftReport {
    pub fn from_results(results: &[ComparisonResult]) -> Self {
        let mut report = Self {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            match result.status {
                DriftStatus::Sync => report.sync += 1,
                DriftStatus::PatchDrift => report.patch += 1,
                DriftStatus::MinorDrift => report.minor += 1,
                DriftStatus::MajorDrift => report.major += 1,
                DriftStatus::Unknown => report.unknown += 1,
            }
        }
        report
    }

    /// Highest known severity; `Unknown` entries are not counted
    pub fn worst(&self) -> Option<DriftStatus> {
        [
            (self.major, DriftStatus::MajorDrift),
            (self.minor, DriftStatus::MinorDrift),
            (self.patch, DriftStatus::PatchDrift),
            (self.sync, DriftStatus::Sync),
        ]
        .into_iter()
        .find(|(count, _)| *count > 0)
        .map(|(_, status)| status)
    }

    /// Whether any release drifted at least as far as `threshold`
    pub fn has_drift_at_least(&self, threshold: DriftStatus) -> bool {
        match self.worst() {
            Some(worst) => worst.is_drift() && worst >= threshold,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{ResolutionSource, UpstreamCandidate};

    fn result_with(status: DriftStatus) -> ComparisonResult {
        let mut result = ComparisonResult::unresolved(Release::new("r", "ns", "chart", "1.0.0"));
        result.status = status;
        result
    }

    #[test]
    fn test_severity_order() {
        assert!(DriftStatus::Sync < DriftStatus::PatchDrift);
        assert!(DriftStatus::PatchDrift < DriftStatus::MinorDrift);
        assert!(DriftStatus::MinorDrift < DriftStatus::MajorDrift);
        assert!(DriftStatus::MajorDrift > DriftStatus::Sync);
    }

    #[test]
    fn test_unknown_is_unordered() {
        assert_eq!(DriftStatus::Unknown.partial_cmp(&DriftStatus::Sync), None);
        assert_eq!(DriftStatus::MajorDrift.partial_cmp(&DriftStatus::Unknown), None);
        assert!(!(DriftStatus::Unknown > DriftStatus::Sync));
        assert!(!(DriftStatus::Unknown < DriftStatus::Sync));
    }

    #[test]
    fn test_wire_tokens() {
        for status in DriftStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("minor".parse::<DriftStatus>().unwrap(), DriftStatus::MinorDrift);
        assert_eq!("MAJOR_DRIFT".parse::<DriftStatus>().unwrap(), DriftStatus::MajorDrift);
        assert_eq!("patch-drift".parse::<DriftStatus>().unwrap(), DriftStatus::PatchDrift);
        assert!("sideways".parse::<DriftStatus>().is_err());
    }

    #[test]
    fn test_unresolved_defaults() {
        let result = ComparisonResult::unresolved(Release::new("r", "ns", "chart", "1.0.0"));
        assert_eq!(result.status, DriftStatus::Unknown);
        assert!(result.latest_version.is_empty());
        assert!(result.upstream_url.is_empty());
    }

    #[test]
    fn test_apply_classifies_against_chart_version() {
        let mut result = ComparisonResult::unresolved(Release::new("r", "ns", "keda", "2.10.0"));
        let candidate = UpstreamCandidate::new("keda", "kedacore", "2.14.1")
            .with_app_version("2.14.0")
            .with_url("https://artifacthub.io/packages/helm/kedacore/keda");
        result.apply(&ResolvedUpstream::from_candidate(&candidate, ResolutionSource::Preset));

        assert_eq!(result.status, DriftStatus::MinorDrift);
        assert_eq!(result.latest_app_version, "2.14.0");
        assert_eq!(result.upstream_url, "https://artifacthub.io/packages/helm/kedacore/keda");
    }

    #[test]
    fn test_report_counts_and_worst() {
        let results = vec![
            result_with(DriftStatus::Sync),
            result_with(DriftStatus::MinorDrift),
            result_with(DriftStatus::Unknown),
            result_with(DriftStatus::PatchDrift),
        ];
        let report = DriftReport::from_results(&results);

        assert_eq!(report.total, 4);
        assert_eq!(report.unknown, 1);
        assert_eq!(report.worst(), Some(DriftStatus::MinorDrift));
        assert!(report.has_drift_at_least(DriftStatus::PatchDrift));
        assert!(report.has_drift_at_least(DriftStatus::MinorDrift));
        assert!(!report.has_drift_at_least(DriftStatus::MajorDrift));
    }

    #[test]
    fn test_report_all_unknown_has_no_worst() {
        let results = vec![result_with(DriftStatus::Unknown)];
        let report = DriftReport::from_results(&results);
        assert_eq!(report.worst(), None);
        assert!(!report.has_drift_at_least(DriftStatus::PatchDrift));
    }

    #[test]
    fn test_wire_format_snapshot() {
        let mut result = ComparisonResult::unresolved(
            Release::new("ingress", "edge", "ingress-nginx", "4.7.0")
                .with_app_version("1.8.0")
                .with_revision(2),
        );
        result.latest_version = "4.10.1".to_string();
        result.latest_app_version = "1.10.1".to_string();
        result.status = DriftStatus::MinorDrift;
        result.upstream_url =
            "https://artifacthub.io/packages/helm/ingress-nginx/ingress-nginx".to_string();
        result.checked_at = "2024-05-01T12:00:00Z".parse().unwrap();

        insta::assert_json_snapshot!(result);
    }
}
