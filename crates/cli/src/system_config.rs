//! Configuration file discovery and loading

use anyhow::{Context, Result};
use mirror_core::MirrorConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config location: `<config dir>/drivemirror/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("drivemirror").join("config.toml"))
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the default location is used
/// if present, otherwise built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<MirrorConfig> {
    if let Some(path) = explicit {
        return MirrorConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    match config_file_path() {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading config");
            MirrorConfig::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        _ => Ok(MirrorConfig::default()),
    }
}
