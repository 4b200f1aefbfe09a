//! Data-directory watcher
//!
//! Polls a cheap fingerprint of the data directory and fires a hub broadcast
//! whenever the upstream producers have written something new.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use crate::hub::NotificationHub;

/// Summary of a directory tree that changes whenever a file is written,
/// added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirFingerprint {
    pub files: usize,
    pub total_bytes: u64,
    pub latest_modified: Option<SystemTime>,
}

impl DirFingerprint {
    /// Walk `root` recursively. Entries that vanish mid-walk are ignored.
    pub fn scan(root: &Path) -> std::io::Result<Self> {
        let mut fp = DirFingerprint::default();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if dir == root => return Err(e),
                Err(_) => continue,
            };

            for entry in entries.flatten() {
                let Ok(meta) = entry.metadata() else { continue };
                if meta.is_dir() {
                    pending.push(entry.path());
                    continue;
                }
                fp.files += 1;
                fp.total_bytes += meta.len();
                if let Ok(modified) = meta.modified() {
                    fp.latest_modified = fp.latest_modified.max(Some(modified));
                }
            }
        }

        Ok(fp)
    }
}

/// Background poller that broadcasts on data-directory changes
pub struct DataWatcher {
    root: PathBuf,
    interval: Duration,
    hub: NotificationHub,
}

impl DataWatcher {
    pub fn new(root: impl Into<PathBuf>, interval: Duration, hub: NotificationHub) -> Self {
        Self {
            root: root.into(),
            interval,
            hub,
        }
    }

    async fn fingerprint(&self) -> Option<DirFingerprint> {
        let root = self.root.clone();
        match tokio::task::spawn_blocking(move || DirFingerprint::scan(&root)).await {
            Ok(Ok(fp)) => Some(fp),
            Ok(Err(e)) => {
                warn!("Failed to scan {}: {}", self.root.display(), e);
                None
            }
            Err(e) => {
                warn!("Data directory scan task failed: {}", e);
                None
            }
        }
    }

    /// Poll forever. The first scan only records a baseline.
    pub async fn run(self) {
        info!(
            "Watching {} for changes every {:?}",
            self.root.display(),
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut last: Option<DirFingerprint> = None;
        loop {
            ticker.tick().await;

            let Some(current) = self.fingerprint().await else {
                continue;
            };

            match last {
                Some(previous) if previous != current => {
                    debug!("Data directory changed: {:?} -> {:?}", previous, current);
                    self.hub.broadcast();
                }
                Some(_) => {}
                None => debug!("Baseline fingerprint: {:?}", current),
            }
            last = Some(current);
        }
    }
}
