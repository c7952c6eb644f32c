//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use super::common::load_config;

/// Execute the config command.
pub fn execute(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;

    match path {
        Some(p) => println!(
            "{} Configuration from {} (with environment overrides)",
            style("→").cyan().bold(),
            style(p.display()).green()
        ),
        None => println!(
            "{} Default configuration (with environment overrides)",
            style("→").cyan().bold()
        ),
    }

    let yaml = serde_yaml_ng::to_string(&config).context("Failed to render configuration")?;
    print!("{yaml}");

    Ok(())
}
