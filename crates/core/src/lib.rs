//! Synchronization engine for drivemirror
//!
//! This crate provides:
//! - Write-completion detection (stability prober)
//! - Copy planning by modification time
//! - Source-to-mirror path mapping
//! - Single-file synchronization with duplicate-event suppression
//! - Full-tree and single-directory reconciliation
//! - Routing of normalized filesystem events
//!
//! The OS notification backend lives in the `watcher` crate.

pub mod cancel;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mirror;
pub mod planner;
pub mod processed;
pub mod reconcile;
pub mod stability;
pub mod sync;
pub mod transient;

// Re-exports
pub use cancel::CancelToken;
pub use config::{DedupPolicy, MirrorConfig, StabilityConfig};
pub use dispatch::{Change, EventDispatcher, FsEvent};
pub use error::{Result, SyncError};
pub use mirror::PathMirror;
pub use planner::{needs_copy, FileEntry};
pub use processed::{Fingerprint, ProcessedSet};
pub use reconcile::{ReconcileReport, TreeReconciler};
pub use stability::{Stability, StabilityProber};
pub use sync::{FileSynchronizer, SkipReason, SyncOutcome};
pub use transient::is_transient;
