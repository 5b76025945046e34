//! KubeScout Engine - upstream drift resolution
//!
//! Given the Helm releases installed in a cluster, this crate finds the latest
//! version of each chart upstream and classifies how far behind the cluster is.
//!
//! - **Transport**: [`UpstreamTransport`] abstracts the package registry;
//!   [`ArtifactHubClient`] is the real implementation, [`MockTransport`] the
//!   in-memory one for tests
//! - **Presets**: curated chart -> repository pins that bypass search
//! - **Resolver**: preset lookup first, otherwise search + ranking
//! - **Orchestrator**: concurrent fan-out over releases with per-release
//!   failure isolation
//!
//! ## Example
//!
//! ```rust,no_run
//! use kubescout_core::Release;
//! use kubescout_engine::{DriftOrchestrator, ScoutConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScoutConfig::load()?;
//! let orchestrator = DriftOrchestrator::from_config(&config)?;
//!
//! let releases = vec![Release::new("ingress", "edge", "ingress-nginx", "4.7.0")];
//! for result in orchestrator.compute_drift(&releases).await {
//!     println!("{} {} -> {}", result.release.name, result.status, result.latest_version);
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifacthub;
pub mod config;
pub mod drift;
pub mod error;
pub mod mock;
pub mod presets;
pub mod resolver;
pub mod transport;

// Re-exports for convenience
pub use artifacthub::ArtifactHubClient;
pub use config::{ArtifactHubConfig, ScoutConfig};
pub use drift::DriftOrchestrator;
pub use error::{Result, UpstreamError};
pub use mock::{CallCounts, MockTransport, TransportCall};
pub use presets::{Preset, PresetTable};
pub use resolver::UpstreamResolver;
pub use transport::UpstreamTransport;
