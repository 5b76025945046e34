//! KubeScout Kube - Kubernetes integration for KubeScout
//!
//! This crate provides:
//! - **Release enumeration**: [`ReleaseSource`] and the Helm-backed
//!   [`HelmReleaseSource`], which reads deployed release records from Secrets
//!   or ConfigMaps
//! - **Record decoding**: Helm v3 `release` payloads (base64, optional gzip, JSON)
//! - **Testing**: [`MockReleaseSource`]

pub mod error;
pub mod helm;
pub mod mock;
pub mod source;

pub use error::{KubeError, Result};
pub use helm::{decode_release, latest_per_release};
pub use mock::MockReleaseSource;
pub use source::{HelmDriver, HelmReleaseSource, ReleaseSource};
