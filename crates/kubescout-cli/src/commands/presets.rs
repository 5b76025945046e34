//! Presets command - show the effective chart-to-package pins

use console::style;
use kubescout_engine::{Preset, ScoutConfig};
use std::collections::BTreeMap;

use crate::error::Result;

pub fn run(config: &ScoutConfig, json: bool) -> Result<()> {
    let table = config.preset_table();

    if json {
        let map: BTreeMap<&str, &Preset> = table.iter().collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    let width = table
        .iter()
        .map(|(chart, _)| chart.len())
        .chain(std::iter::once("CHART".len()))
        .max()
        .unwrap_or(0);

    println!(
        "{}",
        style(format!(
            "{:<width$}  {:<24}  PACKAGE",
            "CHART",
            "REPOSITORY",
            width = width
        ))
        .bold()
    );
    for (chart, preset) in table.iter() {
        let marker = if config.presets.contains_key(chart) {
            format!(" {}", style("(config)").dim())
        } else {
            String::new()
        };
        println!(
            "{:<width$}  {:<24}  {}{}",
            chart,
            preset.repository,
            preset.package,
            marker,
            width = width
        );
    }

    Ok(())
}
