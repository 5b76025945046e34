//! Resolve command - look up the upstream for a single chart name

use console::style;
use kubescout_engine::{ArtifactHubClient, ScoutConfig, UpstreamResolver};

use crate::error::Result;

pub async fn run(config: &ScoutConfig, chart: &str, json: bool) -> Result<()> {
    let client = ArtifactHubClient::new(&config.artifact_hub)?;
    let resolver = UpstreamResolver::new(client, config.preset_table());

    let upstream = resolver.resolve(chart).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&upstream)?);
        return Ok(());
    }

    println!("{}", style(chart).bold());
    println!("  Repository:  {}", upstream.repository);
    println!("  Version:     {}", style(&upstream.latest_version).green());
    if !upstream.latest_app_version.is_empty() {
        println!("  App version: {}", upstream.latest_app_version);
    }
    println!("  Source:      {}", upstream.source);
    if !upstream.url.is_empty() {
        println!("  URL:         {}", style(&upstream.url).cyan());
    }

    Ok(())
}
