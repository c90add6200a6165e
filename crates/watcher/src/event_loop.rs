//! Dispatch loop
//!
//! Runs on one dedicated thread. Messages are handled strictly in arrival
//! order; a stability probe in progress holds up everything behind it.

use crate::normalize::normalize;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use mirror_core::{CancelToken, EventDispatcher, ReconcileReport};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How often an idle loop checks for cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Messages consumed by the dispatch loop
#[derive(Debug)]
pub enum WatchMessage {
    /// Raw event (or backend error) from `notify`
    Notify(notify::Result<notify::Event>),
    /// Run a full reconciliation in sequence with events
    Rescan,
}

/// Consumes [`WatchMessage`]s and feeds them to the dispatcher
pub struct EventLoop {
    dispatcher: EventDispatcher,
    root: PathBuf,
    messages: Receiver<WatchMessage>,
    cancel: CancelToken,
}

impl EventLoop {
    pub fn new(
        dispatcher: EventDispatcher,
        root: PathBuf,
        messages: Receiver<WatchMessage>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            dispatcher,
            root,
            messages,
            cancel,
        }
    }

    /// Block until cancelled or every sender is gone.
    ///
    /// Returns totals across everything handled.
    pub fn run(self) -> ReconcileReport {
        let mut totals = ReconcileReport::default();
        info!(root = %self.root.display(), "Event loop started");

        while !self.cancel.is_cancelled() {
            let message = match self.messages.recv_timeout(POLL_INTERVAL) {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Event channel closed");
                    break;
                }
            };

            match message {
                WatchMessage::Notify(Ok(event)) => {
                    for fs_event in normalize(&event, &self.root) {
                        if self.cancel.is_cancelled() {
                            break;
                        }
                        totals.merge(&self.dispatcher.dispatch(&fs_event));
                    }
                }
                WatchMessage::Notify(Err(e)) => {
                    warn!(error = %e, "File watcher error");
                }
                WatchMessage::Rescan => {
                    info!("Periodic rescan");
                    totals.merge(&self.dispatcher.reconcile_all());
                }
            }
        }

        info!("Event loop stopped");
        totals
    }
}
