//! Single-file synchronization
//!
//! [`FileSynchronizer::sync`] never returns an error: every failure is logged
//! with the path and action and folded into [`SyncOutcome::Failed`], so one
//! bad file cannot stop the event loop or a reconciliation walk.

use crate::error::{IoResultExt, Result};
use crate::mirror::PathMirror;
use crate::planner::FileEntry;
use crate::processed::{Fingerprint, ProcessedSet};
use crate::stability::{Stability, StabilityProber};
use crate::transient::is_transient;
use filetime::FileTime;
use std::fs::{self, Metadata};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Why a file was skipped before any probing or copying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Missing, or not a regular file (anymore)
    NotAFile,
    /// Name marks it as a temp/hidden file
    Transient,
    /// Already handled in this session and unchanged
    Duplicate,
}

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Copied,
    UpToDate,
    Skipped(SkipReason),
    /// Did not settle within the probe budget (or shutdown interrupted the probe)
    Unstable,
    Failed,
}

impl SyncOutcome {
    pub fn is_copied(self) -> bool {
        self == Self::Copied
    }
}

/// Runs one source file through dedup, stability, planning and copy
#[derive(Debug)]
pub struct FileSynchronizer {
    mirror: PathMirror,
    prober: StabilityProber,
    processed: Arc<ProcessedSet>,
}

impl FileSynchronizer {
    pub fn new(mirror: PathMirror, prober: StabilityProber, processed: Arc<ProcessedSet>) -> Self {
        Self {
            mirror,
            prober,
            processed,
        }
    }

    pub fn mirror(&self) -> &PathMirror {
        &self.mirror
    }

    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    /// Mirror `source` if needed. Failures are logged, not returned.
    pub fn sync(&self, source: &Path) -> SyncOutcome {
        match self.try_sync(source) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(path = %source.display(), error = %e, "Failed to sync file");
                SyncOutcome::Failed
            }
        }
    }

    fn try_sync(&self, source: &Path) -> Result<SyncOutcome> {
        let meta = match fs::metadata(source) {
            Ok(meta) if meta.is_file() => meta,
            _ => return Ok(SyncOutcome::Skipped(SkipReason::NotAFile)),
        };

        if is_transient(source) {
            return Ok(SyncOutcome::Skipped(SkipReason::Transient));
        }

        let relative = self.mirror.relative(source)?.to_path_buf();
        let key = ProcessedSet::key_for(source);
        let observed = Fingerprint::from_metadata(&meta).with_path("stat source", source)?;
        if self.processed.is_duplicate(&key, observed) {
            debug!(path = %relative.display(), "Already handled, skipping duplicate event");
            return Ok(SyncOutcome::Skipped(SkipReason::Duplicate));
        }

        debug!(path = %relative.display(), "Waiting for file to settle");
        match self.prober.probe(source) {
            Stability::Stable => {}
            Stability::Unsettled => {
                warn!(path = %relative.display(), "File did not settle, skipping");
                return Ok(SyncOutcome::Unstable);
            }
            Stability::Cancelled => {
                debug!(path = %relative.display(), "Stability probe cancelled");
                return Ok(SyncOutcome::Unstable);
            }
        }

        let destination = self.mirror.resolve(source)?;
        self.mirror.ensure_parent(&destination)?;

        let entry = FileEntry::inspect(source, &destination)?;
        if !entry.needs_copy() {
            debug!(path = %relative.display(), "Already up to date");
            let settled = fs::metadata(source)
                .and_then(|m| Fingerprint::from_metadata(&m))
                .with_path("stat source", source)?;
            self.processed.record(key, settled);
            return Ok(SyncOutcome::UpToDate);
        }

        let (bytes, copied) = copy_preserving(source, &destination)?;
        let settled = Fingerprint::from_metadata(&copied).with_path("stat source", source)?;
        self.processed.record(key, settled);

        info!(
            path = %relative.display(),
            destination = %destination.display(),
            bytes,
            "Copied"
        );
        Ok(SyncOutcome::Copied)
    }
}

/// Copy content and permission bits, then carry over access/modification times.
///
/// Returns the byte count and the source metadata the destination times were
/// taken from.
pub fn copy_preserving(source: &Path, destination: &Path) -> Result<(u64, Metadata)> {
    make_writable(destination)?;

    let bytes = fs::copy(source, destination).with_path("copy", source)?;

    let meta = fs::metadata(source).with_path("stat source", source)?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(destination, atime, mtime).with_path("set times on", destination)?;

    Ok((bytes, meta))
}

/// A previous copy of a read-only source leaves a read-only destination
/// that `fs::copy` cannot open for writing.
fn make_writable(destination: &Path) -> Result<()> {
    let Ok(meta) = fs::metadata(destination) else {
        return Ok(());
    };
    let mut perms = meta.permissions();
    if perms.readonly() {
        perms.set_readonly(false);
        fs::set_permissions(destination, perms).with_path("make writable", destination)?;
    }
    Ok(())
}
