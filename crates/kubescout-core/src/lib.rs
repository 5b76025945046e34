//! KubeScout Core - Core types for Helm release drift reporting
//!
//! This crate provides the foundational types used throughout KubeScout:
//! - `Release`: A deployed Helm release as seen in the cluster
//! - `UpstreamCandidate`: One published package observed upstream
//! - `ResolvedUpstream`: The winning upstream package for a chart name
//! - `DriftStatus` / `ComparisonResult`: The drift report itself
//! - `classify_drift`: Semantic version comparison
//! - `select_best`: Ranking of ambiguous upstream search results

pub mod drift;
pub mod error;
pub mod ranking;
pub mod release;
pub mod upstream;
pub mod version;

pub use drift::{ComparisonResult, DriftReport, DriftStatus};
pub use error::{CoreError, Result};
pub use ranking::select_best;
pub use release::Release;
pub use upstream::{ResolutionSource, ResolvedUpstream, UpstreamCandidate};
pub use version::{classify_drift, parse_lenient};
