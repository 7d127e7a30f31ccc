//! Modification-time polling.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{ChangeFilter, ChangeSource};

type Snapshot = HashMap<PathBuf, SystemTime>;

/// One pass over the roots: the files read, plus the files and subtrees
/// that could not be read this time.
#[derive(Default)]
struct Scan {
    files: Snapshot,
    unreadable: Vec<PathBuf>,
}

impl Scan {
    /// Keep the previous entry for anything under an unreadable path. A read
    /// error is not a removal.
    fn carry_forward(&mut self, previous: &Snapshot) {
        if self.unreadable.is_empty() {
            return;
        }
        for (path, modified) in previous {
            if !self.files.contains_key(path) && self.is_unreadable(path) {
                self.files.insert(path.clone(), *modified);
            }
        }
    }

    fn is_unreadable(&self, path: &Path) -> bool {
        self.unreadable.iter().any(|failed| path.starts_with(failed))
    }
}

/// Reports files whose modification time changed, appeared, or vanished
/// between two scans.
pub struct PollingChangeSource {
    roots: Vec<PathBuf>,
    filter: ChangeFilter,
    poll_interval: Duration,
    snapshot: Snapshot,
}

impl PollingChangeSource {
    pub fn new(roots: &[PathBuf], filter: ChangeFilter, poll_interval: Duration) -> Self {
        let roots = roots.to_vec();
        let snapshot = scan(&roots, &filter).files;
        debug!("Polling {} roots, {} files tracked", roots.len(), snapshot.len());
        Self {
            roots,
            filter,
            poll_interval: poll_interval.max(Duration::from_millis(10)),
            snapshot,
        }
    }

    /// Rescan now and return what differs from the previous scan.
    pub fn poll_once(&mut self) -> Vec<PathBuf> {
        let mut current = scan(&self.roots, &self.filter);
        current.carry_forward(&self.snapshot);
        let changed = diff(&self.snapshot, &current.files);
        self.snapshot = current.files;
        changed
    }
}

#[async_trait]
impl ChangeSource for PollingChangeSource {
    async fn next_change(&mut self) -> Option<Vec<PathBuf>> {
        loop {
            tokio::time::sleep(self.poll_interval).await;
            let changed = self.poll_once();
            if !changed.is_empty() {
                return Some(changed);
            }
        }
    }
}

fn scan(roots: &[PathBuf], filter: &ChangeFilter) -> Scan {
    let mut scan = Scan::default();
    for root in roots {
        if !root.exists() {
            debug!("Watch path does not exist, skipping: {}", root.display());
            continue;
        }
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let failed = e.path().unwrap_or(root.as_path());
                    warn!("Failed to read {}: {}", failed.display(), e);
                    scan.unreadable.push(failed.to_path_buf());
                    continue;
                }
            };
            if !entry.file_type().is_file()
                || !filter.matches_under(std::slice::from_ref(root), entry.path())
            {
                continue;
            }
            match entry.metadata().map_err(std::io::Error::from).and_then(|m| m.modified()) {
                Ok(modified) => {
                    scan.files.insert(entry.into_path(), modified);
                }
                Err(e) => {
                    warn!("Failed to stat {}: {}", entry.path().display(), e);
                    scan.unreadable.push(entry.into_path());
                }
            }
        }
    }
    scan
}

fn diff(before: &Snapshot, after: &Snapshot) -> Vec<PathBuf> {
    let mut changed: Vec<PathBuf> = after
        .iter()
        .filter(|(path, modified)| before.get(*path) != Some(modified))
        .map(|(path, _)| path.clone())
        .chain(
            before
                .keys()
                .filter(|path| !after.contains_key(path.as_path()))
                .cloned(),
        )
        .collect();
    changed.sort();
    changed
}
