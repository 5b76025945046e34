//! KubeScout CLI - report version drift of Helm releases against Artifact Hub

use clap::{Parser, Subcommand};
use kubescout_core::DriftStatus;
use kubescout_engine::ScoutConfig;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

mod commands;
mod display;
mod error;
mod exit_codes;
mod logging;
mod server;

use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "kubescout")]
#[command(version)]
#[command(
    about = "Report version drift between Helm releases and their upstream charts",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: <config dir>/kubescout/config.yaml)
    #[arg(long, global = true, env = "KUBESCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every deployed release with its latest upstream chart
    Check {
        /// Only check releases in this namespace (default: all namespaces)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Exit non-zero when any release drifts this far or further (patch, minor, major)
        #[arg(long, value_parser = commands::check::parse_threshold)]
        fail_on: Option<DriftStatus>,

        /// Maximum concurrent upstream lookups
        #[arg(long)]
        max_concurrency: Option<usize>,

        /// Per-request timeout for Artifact Hub (e.g. 5s, 1m)
        #[arg(long, value_parser = parse_duration)]
        timeout: Option<Duration>,
    },

    /// Resolve the latest upstream version of a single chart
    Resolve {
        /// Chart name as recorded in the release
        chart: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show chart names pinned to a specific Artifact Hub package
    Presets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve drift results as a JSON API until interrupted
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0")]
        bind: IpAddr,

        /// Port to listen on
        #[arg(short, long, default_value_t = 8080, env = "KUBESCOUT_PORT")]
        port: u16,

        /// Only report releases in this namespace (default: all namespaces)
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

fn parse_duration(value: &str) -> std::result::Result<Duration, String> {
    let duration = humantime_serde::re::humantime::parse_duration(value)
        .map_err(|e| e.to_string())?;
    if duration.is_zero() {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(duration)
}

fn load_config(path: Option<&PathBuf>) -> Result<ScoutConfig> {
    match path {
        Some(path) => ScoutConfig::load_from(path).map_err(|e| CliError::Config {
            message: format!("{}: {}", path.display(), e),
            help: None,
        }),
        None => ScoutConfig::load().map_err(|e| CliError::config(e.to_string())),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Check {
            namespace,
            json,
            fail_on,
            max_concurrency,
            timeout,
        } => {
            let opts = commands::check::CheckOptions {
                namespace,
                json,
                fail_on,
                max_concurrency,
                timeout,
            };
            commands::check::run(config, opts).await
        }

        Commands::Resolve { chart, json } => commands::resolve::run(&config, &chart, json).await,

        Commands::Presets { json } => commands::presets::run(&config, json),

        Commands::Serve {
            bind,
            port,
            namespace,
        } => {
            let opts = commands::serve::ServeOptions {
                bind,
                port,
                namespace,
            };
            commands::serve::run(config, opts).await
        }
    }
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    let serving = matches!(cli.command, Commands::Serve { .. });
    logging::init(cli.debug, cli.log_json, serving);

    let code = match run(cli).await {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };

    std::process::exit(code);
}
