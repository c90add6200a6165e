//! One-shot reconciliation

use super::{prepare, print_report, RootArgs};
use anyhow::{Context, Result};
use mirror_core::{CancelToken, EventDispatcher};
use std::path::Path;

pub async fn run(config_path: Option<&Path>, roots: &RootArgs) -> Result<()> {
    let (config, mirror) = prepare(config_path, roots)?;
    let dispatcher = EventDispatcher::from_config(mirror, &config, CancelToken::new());

    let report = tokio::task::spawn_blocking(move || dispatcher.reconcile_all())
        .await
        .context("Reconciliation task failed")?;

    print_report("Reconciliation", &report);
    Ok(())
}
