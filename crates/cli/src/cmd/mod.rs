//! CLI command implementations

pub mod config;
pub mod run;
pub mod sync;

use crate::system_config;
use anyhow::{Context, Result};
use clap::Args;
use mirror_core::{MirrorConfig, PathMirror, ReconcileReport, SyncError};
use owo_colors::OwoColorize;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Source/destination overrides shared by every command
#[derive(Args, Debug, Default)]
pub struct RootArgs {
    /// Folder to watch (overrides `source` in the config file)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Folder to mirror into (overrides `destination` in the config file)
    #[arg(short, long)]
    pub dest: Option<PathBuf>,
}

impl RootArgs {
    pub fn apply(&self, config: &mut MirrorConfig) {
        if let Some(source) = &self.source {
            config.source = Some(source.clone());
        }
        if let Some(dest) = &self.dest {
            config.destination = Some(dest.clone());
        }
    }
}

/// Load config, apply overrides, and validate both roots.
///
/// The watched root must already exist. The mirror root is created if absent.
/// Both are returned as absolute paths.
pub fn prepare(config_path: Option<&Path>, roots: &RootArgs) -> Result<(MirrorConfig, PathMirror)> {
    let mut config = system_config::load(config_path)?;
    roots.apply(&mut config);

    let (source, destination) = config.roots().context("Missing folder to mirror")?;
    let (source, destination) = (source.to_path_buf(), destination.to_path_buf());

    println!("{} {}", "Watched folder:".bold(), source.display());
    println!("   {} {}", "exists:".dimmed(), source.is_dir());
    println!("{} {}", "Mirror folder:".bold(), destination.display());
    println!("   {} {}", "exists:".dimmed(), destination.is_dir());

    if !source.is_dir() {
        return Err(SyncError::RootMissing(source).into());
    }

    let source = std::fs::canonicalize(&source)
        .with_context(|| format!("Failed to resolve {}", source.display()))?;
    let destination = resolve_destination(&destination)?;

    config.source = Some(source.clone());
    config.destination = Some(destination.clone());
    config.validate().context("Invalid configuration")?;

    std::fs::create_dir_all(&destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;
    info!(destination = %destination.display(), "Mirror folder ready");

    Ok((config, PathMirror::new(source, destination)))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(path))
}

/// Canonical form of a mirror root that may not exist yet.
///
/// The deepest existing ancestor is canonicalized (resolving symlinks) and the
/// missing tail is appended with `.` and `..` applied lexically, so the result
/// compares correctly against the canonical watched root.
fn resolve_destination(path: &Path) -> Result<PathBuf> {
    let path = absolute(path)?;
    let components: Vec<Component> = path.components().collect();

    for split in (1..=components.len()).rev() {
        let existing: PathBuf = components[..split].iter().collect();
        let Ok(mut resolved) = std::fs::canonicalize(&existing) else {
            continue;
        };
        for component in &components[split..] {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                other => resolved.push(other.as_os_str()),
            }
        }
        return Ok(resolved);
    }

    Ok(path)
}

/// Print a reconciliation summary
pub fn print_report(title: &str, report: &ReconcileReport) {
    println!("{}", title.bold());
    println!("  {} {}", "Directories:".cyan(), report.directories);
    println!("  {} {}", "Copied:".cyan(), report.copied);
    println!("  {} {}", "Up to date:".cyan(), report.up_to_date);
    println!("  {} {}", "Skipped:".cyan(), report.skipped);
    if report.unstable > 0 {
        println!("  {} {}", "Not settled:".yellow(), report.unstable);
    }
    if report.failed + report.walk_errors > 0 {
        println!("  {} {}", "Failed:".red(), report.failed + report.walk_errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_args_override_config() {
        let mut config = MirrorConfig {
            source: Some(PathBuf::from("/from/file")),
            destination: Some(PathBuf::from("/to/file")),
            ..Default::default()
        };
        let args = RootArgs {
            source: Some(PathBuf::from("/from/flag")),
            dest: None,
        };

        args.apply(&mut config);

        assert_eq!(config.source, Some(PathBuf::from("/from/flag")));
        assert_eq!(config.destination, Some(PathBuf::from("/to/file")));
    }

    #[test]
    fn test_resolve_destination_applies_parent_components() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let base = std::fs::canonicalize(temp_dir.path()).unwrap();
        std::fs::create_dir_all(base.join("source")).unwrap();

        let resolved = resolve_destination(&base.join("source/../out/./nested")).unwrap();

        assert_eq!(resolved, base.join("out/nested"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_destination_follows_symlinked_ancestor() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let base = std::fs::canonicalize(temp_dir.path()).unwrap();
        std::fs::create_dir_all(base.join("source")).unwrap();
        std::os::unix::fs::symlink(base.join("source"), base.join("link")).unwrap();

        let resolved = resolve_destination(&base.join("link/mirror")).unwrap();

        assert_eq!(resolved, base.join("source/mirror"));
    }

    #[test]
    fn test_absolute_joins_relative_paths() {
        let path = absolute(Path::new("mirror")).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("mirror"));
    }
}
