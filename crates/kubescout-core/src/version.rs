//! Semantic version comparison for drift classification
//!
//! Upstream data quality is not guaranteed, so anything that fails to parse
//! classifies as [`DriftStatus::Unknown`] instead of raising an error.

use semver::{Prerelease, Version};
use std::cmp::Ordering;

use crate::drift::DriftStatus;
use crate::error::{CoreError, Result};

/// Parse a chart version, tolerating a leading `v` and missing components
///
/// `1` and `1.2` are read as `1.0.0` and `1.2.0`. Pre-release and build
/// suffixes are kept.
pub fn parse_lenient(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split);

    let normalized = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, suffix),
        2 => format!("{}.0{}", core, suffix),
        _ => trimmed.to_string(),
    };

    Version::parse(&normalized).map_err(|source| CoreError::InvalidVersion {
        input: input.to_string(),
        source,
    })
}

/// Ordering key that ignores build metadata
fn precedence(v: &Version) -> (u64, u64, u64, &Prerelease) {
    (v.major, v.minor, v.patch, &v.pre)
}

/// Classify how far `current` lags behind `latest`
///
/// A current version at or ahead of `latest` is reported as `Sync`; the tool
/// never flags "ahead of upstream".
#[must_use]
pub fn classify_drift(current: &str, latest: &str) -> DriftStatus {
    let (Ok(current), Ok(latest)) = (parse_lenient(current), parse_lenient(latest)) else {
        return DriftStatus::Unknown;
    };

    match precedence(&latest).cmp(&precedence(&current)) {
        Ordering::Greater if latest.major != current.major => DriftStatus::MajorDrift,
        Ordering::Greater if latest.minor != current.minor => DriftStatus::MinorDrift,
        Ordering::Greater => DriftStatus::PatchDrift,
        Ordering::Equal | Ordering::Less => DriftStatus::Sync,
    }
}
