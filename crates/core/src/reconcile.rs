//! Tree reconciliation
//!
//! [`TreeReconciler::sync_all`] brings the whole mirror up to date in two
//! passes: every directory first, then every file. Creating all directories
//! up front means no file copy races another for a parent, and the result
//! does not depend on event ordering.

use crate::error::{IoResultExt, Result};
use crate::sync::{FileSynchronizer, SyncOutcome};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Counts from one reconciliation or directory sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Destination directories ensured
    pub directories: usize,
    pub copied: usize,
    pub up_to_date: usize,
    /// Transient, duplicate or non-regular entries
    pub skipped: usize,
    pub unstable: usize,
    pub failed: usize,
    /// Entries the walk itself could not read
    pub walk_errors: usize,
}

impl ReconcileReport {
    pub fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Copied => self.copied += 1,
            SyncOutcome::UpToDate => self.up_to_date += 1,
            SyncOutcome::Skipped(_) => self.skipped += 1,
            SyncOutcome::Unstable => self.unstable += 1,
            SyncOutcome::Failed => self.failed += 1,
        }
    }

    /// Number of files that reached the synchronizer
    pub fn files(&self) -> usize {
        self.copied + self.up_to_date + self.skipped + self.unstable + self.failed
    }

    pub fn merge(&mut self, other: &ReconcileReport) {
        self.directories += other.directories;
        self.copied += other.copied;
        self.up_to_date += other.up_to_date;
        self.skipped += other.skipped;
        self.unstable += other.unstable;
        self.failed += other.failed;
        self.walk_errors += other.walk_errors;
    }
}

/// Full-tree and single-directory synchronization
#[derive(Debug, Clone)]
pub struct TreeReconciler {
    synchronizer: Arc<FileSynchronizer>,
}

impl TreeReconciler {
    pub fn new(synchronizer: Arc<FileSynchronizer>) -> Self {
        Self { synchronizer }
    }

    pub fn synchronizer(&self) -> &FileSynchronizer {
        &self.synchronizer
    }

    /// Walk the whole watched root: directories first, then files
    pub fn sync_all(&self) -> ReconcileReport {
        let root = self.synchronizer.mirror().watched_root().to_path_buf();
        let mut report = ReconcileReport::default();

        info!(root = %root.display(), "Reconciling full tree");

        // Pass 1: directories
        for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Failed to read directory entry");
                    report.walk_errors += 1;
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            match self.ensure_mirrored_dir(entry.path()) {
                Ok(()) => report.directories += 1,
                Err(e) => {
                    error!(path = %entry.path().display(), error = %e, "Failed to create directory");
                    report.failed += 1;
                }
            }
        }

        // Pass 2: files
        for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Failed to read directory entry");
                    report.walk_errors += 1;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            report.record(self.synchronizer.sync(entry.path()));
        }

        info!(
            directories = report.directories,
            copied = report.copied,
            up_to_date = report.up_to_date,
            skipped = report.skipped,
            unstable = report.unstable,
            failed = report.failed,
            "Reconciliation complete"
        );

        report
    }

    /// Mirror one directory and its immediate files.
    ///
    /// Subdirectories are left alone; each arrives as its own creation event.
    pub fn sync_directory(&self, source_dir: &Path) -> ReconcileReport {
        match self.try_sync_directory(source_dir) {
            Ok(report) => report,
            Err(e) => {
                error!(path = %source_dir.display(), error = %e, "Failed to sync directory");
                ReconcileReport {
                    failed: 1,
                    ..Default::default()
                }
            }
        }
    }

    fn try_sync_directory(&self, source_dir: &Path) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();

        self.ensure_mirrored_dir(source_dir)?;
        report.directories += 1;

        let entries = fs::read_dir(source_dir).with_path("read directory", source_dir)?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = %source_dir.display(), error = %e, "Failed to read directory entry");
                    report.walk_errors += 1;
                    continue;
                }
            };

            let path = entry.path();
            if path.is_file() {
                report.record(self.synchronizer.sync(&path));
            }
        }

        Ok(report)
    }

    fn ensure_mirrored_dir(&self, source_dir: &Path) -> Result<()> {
        let mirror = self.synchronizer.mirror();
        let destination = mirror.resolve(source_dir)?;
        mirror.ensure_dir(&destination)?;
        debug!(
            path = %mirror.relative(source_dir)?.display(),
            "Directory mirrored"
        );
        Ok(())
    }
}
