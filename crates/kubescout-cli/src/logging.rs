//! Tracing subscriber setup
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "KUBESCOUT_LOG";

const DEFAULT_FILTER: &str = "warn";
const DEBUG_FILTER: &str = "warn,kubescout=debug,kubescout_engine=debug,kubescout_kube=debug";
/// A long-running server reports each request
const SERVE_FILTER: &str = "warn,kubescout=info,kubescout_engine=info,kubescout_kube=info";

/// Install the global subscriber. `KUBESCOUT_LOG` wins over `--debug`.
pub fn init(debug: bool, json: bool, serving: bool) {
    let fallback = fallback_filter(debug, serving);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(debug)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("failed to install log subscriber: {}", e);
    }
}

fn fallback_filter(debug: bool, serving: bool) -> &'static str {
    match (debug, serving) {
        (true, _) => DEBUG_FILTER,
        (false, true) => SERVE_FILTER,
        (false, false) => DEFAULT_FILTER,
    }
}
