//! Mirror configuration
//!
//! Loaded from a TOML file; every field has a default so a file may set
//! only what it needs. Example:
//!
//! ```toml
//! source = "/home/me/Upload"
//! destination = "/mnt/drive/Upload"
//! dedup = "fingerprint"
//! rescan_interval_secs = 0
//!
//! [stability]
//! rounds = 10
//! retry_delay_ms = 1000
//! settle_ms = 500
//! ```

use crate::error::{IoResultExt, Result, SyncError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration for a mirroring session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Watched root (source tree)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Mirror root (destination tree)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,

    /// How repeated events for the same path are suppressed
    #[serde(default)]
    pub dedup: DedupPolicy,

    /// Full rescan interval in seconds (0 = disabled)
    #[serde(default)]
    pub rescan_interval_secs: u64,

    /// Write-completion detection
    #[serde(default)]
    pub stability: StabilityConfig,
}

impl MirrorConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SyncError::InvalidConfig(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_path("read config", path)?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SyncError::InvalidConfig(e.to_string()))
    }

    /// Check value ranges and required fields
    pub fn validate(&self) -> Result<()> {
        let (source, destination) = self.roots()?;

        if source == destination || destination.starts_with(source) {
            return Err(SyncError::InvalidConfig(format!(
                "destination {} must not be inside source {}",
                destination.display(),
                source.display()
            )));
        }

        self.stability.validate()
    }

    /// Both roots, or an error naming the missing one
    pub fn roots(&self) -> Result<(&Path, &Path)> {
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| SyncError::InvalidConfig("source is not set".to_string()))?;
        let destination = self
            .destination
            .as_deref()
            .ok_or_else(|| SyncError::InvalidConfig("destination is not set".to_string()))?;
        Ok((source, destination))
    }

    /// Rescan interval, if enabled
    pub fn rescan_interval(&self) -> Option<Duration> {
        (self.rescan_interval_secs > 0).then(|| Duration::from_secs(self.rescan_interval_secs))
    }
}

/// Stability probe tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityConfig {
    /// Maximum probe rounds before giving up (default: 10)
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Wait after a failed open, in milliseconds (default: 1000)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Gap between the two size samples, in milliseconds (default: 500)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl StabilityConfig {
    const MAX_ROUNDS: u32 = 120;
    const MAX_DELAY_MS: u64 = 60_000;

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=Self::MAX_ROUNDS).contains(&self.rounds) {
            return Err(SyncError::InvalidConfig(format!(
                "stability.rounds must be between 1 and {}, got {}",
                Self::MAX_ROUNDS,
                self.rounds
            )));
        }
        if self.retry_delay_ms > Self::MAX_DELAY_MS || self.settle_ms > Self::MAX_DELAY_MS {
            return Err(SyncError::InvalidConfig(format!(
                "stability delays must not exceed {} ms",
                Self::MAX_DELAY_MS
            )));
        }
        Ok(())
    }
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            retry_delay_ms: default_retry_delay_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

/// Duplicate-event suppression policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Skip only if size and mtime match what was last handled
    #[default]
    Fingerprint,

    /// Skip any path already handled this session, even if it changed since.
    /// Can miss a second modification of the same file.
    PathOnly,
}

fn default_rounds() -> u32 {
    10
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_settle_ms() -> u64 {
    500
}
