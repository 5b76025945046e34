//! Serve command - expose drift results over HTTP

use console::style;
use kubescout_engine::{DriftOrchestrator, ScoutConfig};
use kubescout_kube::{HelmDriver, HelmReleaseSource};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;

use crate::error::{CliError, Result};
use crate::server::{self, AppState};

/// Options for `kubescout serve`
#[derive(Debug)]
pub struct ServeOptions {
    pub bind: IpAddr,
    pub port: u16,
    /// Restrict listing to one namespace; `None` lists all namespaces
    pub namespace: Option<String>,
}

pub async fn run(config: ScoutConfig, opts: ServeOptions) -> Result<()> {
    let driver = HelmDriver::from_env()?;
    let orchestrator = DriftOrchestrator::from_config(&config)?;
    let source = HelmReleaseSource::new(driver, opts.namespace).await?;

    let addr = SocketAddr::new(opts.bind, opts.port);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| CliError::internal(format!("failed to bind {}: {}", addr, e)))?;
    let local = listener.local_addr()?;

    eprintln!(
        "{} KubeScout API listening on {}",
        style("→").cyan(),
        style(format!("http://{}", local)).bold()
    );
    tracing::info!(address = %local, driver = %driver, "serving drift API");

    server::serve(listener, AppState { source, orchestrator }).await?;
    Ok(())
}
