//! Session-scoped record of handled files
//!
//! Suppresses duplicate notifications (one save often yields a create and one
//! or more modify events). Lives for one monitoring session and is never
//! persisted. Safe to share across threads.

use crate::config::DedupPolicy;
use dashmap::DashMap;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Size and mtime of a source file when it was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub mtime: SystemTime,
    pub len: u64,
}

impl Fingerprint {
    pub fn from_metadata(meta: &Metadata) -> io::Result<Self> {
        Ok(Self {
            mtime: meta.modified()?,
            len: meta.len(),
        })
    }
}

/// Map of handled source paths to their fingerprint at handling time
#[derive(Debug)]
pub struct ProcessedSet {
    entries: DashMap<PathBuf, Fingerprint>,
    policy: DedupPolicy,
}

impl ProcessedSet {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            entries: DashMap::new(),
            policy,
        }
    }

    /// Canonical key for `path`, falling back to the path as given
    pub fn key_for(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    /// Whether an event for `key` with `current` fingerprint can be skipped
    pub fn is_duplicate(&self, key: &Path, current: Fingerprint) -> bool {
        match self.policy {
            DedupPolicy::PathOnly => self.entries.contains_key(key),
            DedupPolicy::Fingerprint => self
                .entries
                .get(key)
                .is_some_and(|seen| *seen == current),
        }
    }

    pub fn record(&self, key: PathBuf, fingerprint: Fingerprint) {
        self.entries.insert(key, fingerprint);
    }

    /// Fingerprint recorded for `key`, if handled this session
    pub fn fingerprint(&self, key: &Path) -> Option<Fingerprint> {
        self.entries.get(key).map(|seen| *seen)
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }
}

impl Default for ProcessedSet {
    fn default() -> Self {
        Self::new(DedupPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fp(secs: u64, len: u64) -> Fingerprint {
        Fingerprint {
            mtime: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
            len,
        }
    }

    #[test]
    fn test_fingerprint_policy_only_skips_unchanged() {
        let set = ProcessedSet::new(DedupPolicy::Fingerprint);
        let key = PathBuf::from("/root/a.txt");

        assert!(!set.is_duplicate(&key, fp(100, 10)));
        set.record(key.clone(), fp(100, 10));

        assert!(set.is_duplicate(&key, fp(100, 10)));
        assert!(!set.is_duplicate(&key, fp(101, 10)));
        assert!(!set.is_duplicate(&key, fp(100, 11)));
    }

    #[test]
    fn test_path_only_policy_skips_any_seen_path() {
        let set = ProcessedSet::new(DedupPolicy::PathOnly);
        let key = PathBuf::from("/root/a.txt");
        set.record(key.clone(), fp(100, 10));

        assert!(set.is_duplicate(&key, fp(200, 99)));
        assert!(!set.is_duplicate(Path::new("/root/b.txt"), fp(100, 10)));
    }

    #[test]
    fn test_record_replaces_fingerprint() {
        let set = ProcessedSet::default();
        let key = PathBuf::from("/root/a.txt");
        set.record(key.clone(), fp(1, 1));
        set.record(key.clone(), fp(2, 2));

        assert_eq!(set.len(), 1);
        assert!(set.is_duplicate(&key, fp(2, 2)));
    }
}
