//! Show the effective configuration

use super::RootArgs;
use crate::system_config;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(config_path: Option<&Path>, roots: &RootArgs) -> Result<()> {
    let mut config = system_config::load(config_path)?;
    roots.apply(&mut config);

    let location = match config_path {
        Some(path) => path.display().to_string(),
        None => system_config::config_file_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "(no config directory)".to_string()),
    };

    println!("{}", "Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), location.dimmed());

    let rendered = config
        .to_toml_string()
        .context("Failed to render configuration")?;
    for line in rendered.lines() {
        if line.starts_with('[') {
            println!("{}", line.yellow());
        } else {
            println!("{}", line);
        }
    }

    if let Err(e) = config.validate() {
        println!("\n{} {}", "Warning:".yellow(), e);
    }

    Ok(())
}
