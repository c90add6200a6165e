//! Error types for the synchronization engine

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while mirroring a single entry or validating roots
#[derive(Debug, Error)]
pub enum SyncError {
    /// A filesystem operation failed
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path is not located under the watched root
    #[error("{} is outside the watched root {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// Watched root does not exist or is not a directory
    #[error("watched root does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    /// Configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SyncError {
    /// Build an I/O error tagged with the failing action and path
    pub fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Extension for attaching action/path context to `io::Result`
pub trait IoResultExt<T> {
    fn with_path(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|e| SyncError::io(action, path, e))
    }
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, SyncError>;
