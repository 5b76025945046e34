//! Standard exit codes for CLI operations
//!
//! Code 2 is left to clap, which uses it for invalid arguments.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Configuration error - unreadable or invalid config file, bad HELM_DRIVER
pub const CONFIG_ERROR: i32 = 3;

/// Cluster error - releases could not be listed
pub const CLUSTER_ERROR: i32 = 4;

/// Upstream error - a single-chart lookup failed
pub const UPSTREAM_ERROR: i32 = 5;

/// Drift at or above the `--fail-on` threshold was found
pub const DRIFT_DETECTED: i32 = 6;
