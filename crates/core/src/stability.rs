//! Write-completion detection
//!
//! A file is considered finished once it can be opened for reading and its
//! size is non-zero and unchanged across a short settle window. This works the
//! same whether the writer appends slowly or swaps a temp file into place, and
//! does not depend on close notifications.

use crate::cancel::CancelToken;
use crate::config::StabilityConfig;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::trace;

/// Result of probing a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    /// Two consecutive equal, non-zero size samples
    Stable,
    /// Round budget exhausted without settling
    Unsettled,
    /// Session shut down while probing
    Cancelled,
}

impl Stability {
    pub fn is_stable(self) -> bool {
        self == Self::Stable
    }
}

/// Polls a file until its size settles or the round budget runs out
#[derive(Debug, Clone)]
pub struct StabilityProber {
    config: StabilityConfig,
    cancel: CancelToken,
}

impl StabilityProber {
    pub fn new(config: StabilityConfig, cancel: CancelToken) -> Self {
        Self { config, cancel }
    }

    /// Convenience wrapper over [`probe`](Self::probe)
    pub fn is_stable(&self, path: &Path) -> bool {
        self.probe(path).is_stable()
    }

    /// Probe `path` for up to `rounds` rounds.
    ///
    /// Each round: open + size, wait the settle window, size again. An open or
    /// stat failure costs one retry delay and moves on to the next round.
    pub fn probe(&self, path: &Path) -> Stability {
        for round in 1..=self.config.rounds {
            if self.cancel.is_cancelled() {
                return Stability::Cancelled;
            }

            let first = match open_and_size(path) {
                Ok(size) => size,
                Err(e) => {
                    trace!(path = %path.display(), round, error = %e, "file not readable yet");
                    if self.cancel.wait(self.config.retry_delay()) {
                        return Stability::Cancelled;
                    }
                    continue;
                }
            };

            if self.cancel.wait(self.config.settle_window()) {
                return Stability::Cancelled;
            }

            let second = match fs::metadata(path) {
                Ok(meta) => meta.len(),
                Err(e) => {
                    trace!(path = %path.display(), round, error = %e, "stat failed after settle");
                    if self.cancel.wait(self.config.retry_delay()) {
                        return Stability::Cancelled;
                    }
                    continue;
                }
            };

            if first == second && first > 0 {
                return Stability::Stable;
            }

            trace!(path = %path.display(), round, first, second, "size not settled");
        }

        Stability::Unsettled
    }
}

fn open_and_size(path: &Path) -> io::Result<u64> {
    let file = File::open(path)?;
    Ok(file.metadata()?.len())
}
