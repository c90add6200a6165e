//! File system watching for drivemirror
//!
//! This crate provides:
//! - A recursive `notify` watcher over the watched root
//! - Translation of backend events into normalized [`FsEvent`]s
//! - The single-threaded dispatch loop
//! - Optional periodic rescans
//!
//! [`FsEvent`]: mirror_core::FsEvent

pub mod event_loop;
pub mod normalize;
pub mod reconcile;

pub use event_loop::{EventLoop, WatchMessage};
pub use normalize::normalize;
pub use reconcile::PeriodicReconciler;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use mirror_core::{CancelToken, EventDispatcher};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Recursive watcher over the watched root
///
/// Owns the backend watcher; dropping it stops event delivery.
pub struct MirrorWatcher {
    watcher: RecommendedWatcher,
    root: PathBuf,
    sender: Sender<WatchMessage>,
    receiver: Receiver<WatchMessage>,
}

impl MirrorWatcher {
    /// Start watching `root` recursively
    pub fn start(root: &Path) -> Result<Self> {
        let (sender, receiver) = crossbeam_channel::unbounded();

        let event_tx = sender.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if event_tx.send(WatchMessage::Notify(res)).is_err() {
                warn!("Dispatch loop gone, dropping file event");
            }
        })
        .context("Failed to create file watcher")?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;

        info!(root = %root.display(), "Watching for changes");

        Ok(Self {
            watcher,
            root: root.to_path_buf(),
            sender,
            receiver,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sender for injecting messages (e.g. periodic rescans)
    pub fn sender(&self) -> Sender<WatchMessage> {
        self.sender.clone()
    }

    /// Dispatch loop consuming this watcher's events
    pub fn event_loop(&self, dispatcher: EventDispatcher, cancel: CancelToken) -> EventLoop {
        EventLoop::new(dispatcher, self.root.clone(), self.receiver.clone(), cancel)
    }

    /// Stop delivering events
    pub fn stop(mut self) -> Result<()> {
        self.watcher
            .unwatch(&self.root)
            .with_context(|| format!("Failed to unwatch {}", self.root.display()))?;
        info!(root = %self.root.display(), "Stopped watching");
        Ok(())
    }
}
