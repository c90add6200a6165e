//! Normalized filesystem events and their routing
//!
//! The OS-specific event source translates its notifications into [`FsEvent`]
//! and hands them to [`EventDispatcher::dispatch`] one at a time.

use crate::cancel::CancelToken;
use crate::config::MirrorConfig;
use crate::mirror::PathMirror;
use crate::processed::ProcessedSet;
use crate::reconcile::{ReconcileReport, TreeReconciler};
use crate::stability::StabilityProber;
use crate::sync::FileSynchronizer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// What happened to an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Created { path: PathBuf },
    Modified { path: PathBuf },
    /// `from` is unknown when the backend only reports the destination
    Moved { from: Option<PathBuf>, to: PathBuf },
}

impl Change {
    /// Path the change leaves behind
    pub fn target(&self) -> &Path {
        match self {
            Change::Created { path } | Change::Modified { path } => path,
            Change::Moved { to, .. } => to,
        }
    }
}

/// A change to a directory or to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    Directory(Change),
    File(Change),
}

impl FsEvent {
    pub fn target(&self) -> &Path {
        match self {
            FsEvent::Directory(change) | FsEvent::File(change) => change.target(),
        }
    }
}

/// Routes events to the reconciler (directories) or synchronizer (files)
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    reconciler: TreeReconciler,
}

impl EventDispatcher {
    pub fn new(reconciler: TreeReconciler) -> Self {
        Self { reconciler }
    }

    /// Wire up prober, processed set, synchronizer and reconciler for one session
    pub fn from_config(mirror: PathMirror, config: &MirrorConfig, cancel: CancelToken) -> Self {
        let prober = StabilityProber::new(config.stability.clone(), cancel);
        let processed = Arc::new(ProcessedSet::new(config.dedup));
        let synchronizer = Arc::new(FileSynchronizer::new(mirror, prober, processed));
        Self::new(TreeReconciler::new(synchronizer))
    }

    pub fn reconciler(&self) -> &TreeReconciler {
        &self.reconciler
    }

    /// Full two-pass reconciliation of the watched root
    pub fn reconcile_all(&self) -> ReconcileReport {
        self.reconciler.sync_all()
    }

    pub fn dispatch(&self, event: &FsEvent) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        match event {
            FsEvent::Directory(Change::Created { path }) => {
                info!(path = %path.display(), "Directory created");
                report = self.reconciler.sync_directory(path);
            }
            FsEvent::Directory(Change::Modified { path }) => {
                debug!(path = %path.display(), "Ignoring directory modification");
            }
            FsEvent::Directory(Change::Moved { from, to }) => {
                // The old mirrored directory is left in place
                info!(from = ?from, to = %to.display(), "Directory moved");
                report = self.reconciler.sync_directory(to);
            }
            FsEvent::File(Change::Created { path }) => {
                info!(path = %path.display(), "File created");
                report.record(self.reconciler.synchronizer().sync(path));
            }
            FsEvent::File(Change::Modified { path }) => {
                debug!(path = %path.display(), "File modified");
                report.record(self.reconciler.synchronizer().sync(path));
            }
            FsEvent::File(Change::Moved { from, to }) => {
                info!(from = ?from, to = %to.display(), "File moved");
                report.record(self.reconciler.synchronizer().sync(to));
            }
        }

        report
    }
}
