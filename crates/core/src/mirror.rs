//! Source-to-destination path mapping

use crate::error::{IoResultExt, Result, SyncError};
use std::fs;
use std::path::{Path, PathBuf};

/// Maps paths under the watched root onto the mirror root
#[derive(Debug, Clone)]
pub struct PathMirror {
    watched_root: PathBuf,
    mirror_root: PathBuf,
}

impl PathMirror {
    pub fn new(watched_root: impl Into<PathBuf>, mirror_root: impl Into<PathBuf>) -> Self {
        Self {
            watched_root: watched_root.into(),
            mirror_root: mirror_root.into(),
        }
    }

    pub fn watched_root(&self) -> &Path {
        &self.watched_root
    }

    pub fn mirror_root(&self) -> &Path {
        &self.mirror_root
    }

    /// Path of `source` relative to the watched root
    pub fn relative<'a>(&self, source: &'a Path) -> Result<&'a Path> {
        source
            .strip_prefix(&self.watched_root)
            .map_err(|_| SyncError::OutsideRoot {
                path: source.to_path_buf(),
                root: self.watched_root.clone(),
            })
    }

    /// Destination path for `source`
    pub fn resolve(&self, source: &Path) -> Result<PathBuf> {
        let relative = self.relative(source)?;
        if relative.as_os_str().is_empty() {
            return Ok(self.mirror_root.clone());
        }
        Ok(self.mirror_root.join(relative))
    }

    /// Create every missing ancestor of `destination`
    pub fn ensure_parent(&self, destination: &Path) -> Result<()> {
        match destination.parent() {
            Some(parent) => self.ensure_dir(parent),
            None => Ok(()),
        }
    }

    /// Create `destination` and its ancestors; no-op if present
    pub fn ensure_dir(&self, destination: &Path) -> Result<()> {
        fs::create_dir_all(destination).with_path("create directory", destination)
    }
}
