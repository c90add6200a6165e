//! Periodic reconciliation trigger
//!
//! Events can be missed (watcher overflow, a file that never settled within
//! the probe budget, changes made while the daemon was busy). When enabled,
//! this task queues a full rescan into the dispatch loop at a fixed interval.
//! The rescan itself runs on the dispatch thread, in order with events.

use crate::event_loop::WatchMessage;
use anyhow::Result;
use crossbeam_channel::Sender;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Periodic rescan scheduler
pub struct PeriodicReconciler {
    /// Time between rescans
    interval: Duration,

    /// Queue shared with the dispatch loop
    requests: Sender<WatchMessage>,
}

impl PeriodicReconciler {
    pub fn new(interval: Duration, requests: Sender<WatchMessage>) -> Self {
        Self { interval, requests }
    }

    /// Queue a rescan every interval until the dispatch loop goes away.
    ///
    /// The first rescan comes one full interval after start, since startup
    /// already ran a reconciliation.
    pub async fn run(self) -> Result<()> {
        let mut timer = interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Starting periodic reconciliation (interval: {:?})", self.interval);

        // First tick completes immediately
        timer.tick().await;

        loop {
            timer.tick().await;

            if self.requests.send(WatchMessage::Rescan).is_err() {
                debug!("Dispatch loop gone, stopping periodic reconciliation");
                return Ok(());
            }
            debug!("Queued periodic rescan");
        }
    }
}
