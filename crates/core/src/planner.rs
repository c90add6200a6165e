//! Copy planning by existence and modification time
//!
//! A destination is stale when it is missing or strictly older than its
//! source. Equal timestamps count as current, so a file written within the
//! filesystem's timestamp granularity of an existing copy can be missed.
//! That is a known limitation, not something to paper over here.

use crate::error::{IoResultExt, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Source/destination pair with the timestamps that decide a copy
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_mtime: SystemTime,
    /// `None` when the destination does not exist
    pub destination_mtime: Option<SystemTime>,
}

impl FileEntry {
    /// Stat both sides
    pub fn inspect(source: &Path, destination: &Path) -> Result<Self> {
        let source_mtime = fs::metadata(source)
            .and_then(|m| m.modified())
            .with_path("stat source", source)?;

        let destination_mtime = match fs::metadata(destination) {
            Ok(meta) => Some(meta.modified().with_path("stat destination", destination)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e).with_path("stat destination", destination),
        };

        Ok(Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_mtime,
            destination_mtime,
        })
    }

    pub fn needs_copy(&self) -> bool {
        match self.destination_mtime {
            None => true,
            Some(dest_mtime) => self.source_mtime > dest_mtime,
        }
    }
}

/// True if `destination` is missing or older than `source`
pub fn needs_copy(source: &Path, destination: &Path) -> Result<bool> {
    Ok(FileEntry::inspect(source, destination)?.needs_copy())
}
