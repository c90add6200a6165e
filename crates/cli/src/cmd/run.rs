//! Run the mirroring daemon in the foreground

use super::{prepare, print_report, RootArgs};
use anyhow::{Context, Result};
use mirror_core::{CancelToken, EventDispatcher};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use watcher::{MirrorWatcher, PeriodicReconciler};

pub async fn run(
    config_path: Option<&Path>,
    roots: &RootArgs,
    rescan_interval: Option<u64>,
) -> Result<()> {
    let (mut config, mirror) = prepare(config_path, roots)?;
    if let Some(secs) = rescan_interval {
        config.rescan_interval_secs = secs;
    }

    let cancel = CancelToken::new();
    let dispatcher = EventDispatcher::from_config(mirror.clone(), &config, cancel.clone());

    // Watch before reconciling so changes made during the first pass are queued
    let watcher = MirrorWatcher::start(mirror.watched_root())?;
    let event_loop = watcher.event_loop(dispatcher.clone(), cancel.clone());

    let worker = tokio::task::spawn_blocking(move || {
        let report = dispatcher.reconcile_all();
        print_report("Initial reconciliation", &report);
        event_loop.run()
    });

    let rescan = config.rescan_interval().map(|interval| {
        tokio::spawn(PeriodicReconciler::new(interval, watcher.sender()).run())
    });

    println!("Mirroring changes. Press Ctrl-C to stop.");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    info!("Shutting down");
    cancel.cancel();

    if let Some(task) = rescan {
        task.abort();
    }

    match tokio::time::timeout(Duration::from_secs(30), worker).await {
        Ok(Ok(totals)) => info!(
            copied = totals.copied,
            failed = totals.failed,
            "Dispatch loop stopped"
        ),
        Ok(Err(e)) => warn!("Dispatch loop ended abnormally: {}", e),
        Err(_) => warn!("Timed out waiting for the dispatch loop"),
    }

    watcher.stop()?;
    Ok(())
}
