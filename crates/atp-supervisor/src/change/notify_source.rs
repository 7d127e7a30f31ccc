//! Native file-system events via `notify`.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{ChangeFilter, ChangeSource};
use crate::error::SupervisorError;

/// Change source backed by the platform's recommended watcher.
pub struct NotifyChangeSource {
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<Event>,
    filter: ChangeFilter,
    /// Watched roots, as given and canonicalized.
    roots: Vec<PathBuf>,
}

impl NotifyChangeSource {
    /// Watch every existing root recursively. Missing roots are skipped.
    pub fn new(roots: &[PathBuf], filter: ChangeFilter) -> Result<Self, SupervisorError> {
        let (tx, events) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    let _ = tx.send(event);
                }
                Err(e) => warn!("File watcher error: {}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        let mut watched = Vec::new();
        for root in roots {
            if !root.exists() {
                debug!("Watch path does not exist, skipping: {}", root.display());
                continue;
            }
            watcher.watch(root, RecursiveMode::Recursive)?;
            info!("Watching for source changes: {}", root.display());
            watched.push(root.clone());
            if let Ok(canonical) = root.canonicalize() {
                if &canonical != root {
                    watched.push(canonical);
                }
            }
        }

        Ok(Self {
            _watcher: watcher,
            events,
            filter,
            roots: watched,
        })
    }

    fn relevant_paths(&self, event: Event) -> Vec<PathBuf> {
        if !matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) {
            return Vec::new();
        }
        event
            .paths
            .into_iter()
            .filter(|p| self.filter.matches_under(&self.roots, p))
            .collect()
    }
}

#[async_trait]
impl ChangeSource for NotifyChangeSource {
    async fn next_change(&mut self) -> Option<Vec<PathBuf>> {
        loop {
            let event = self.events.recv().await?;
            let paths = self.relevant_paths(event);
            if !paths.is_empty() {
                return Some(paths);
            }
        }
    }
}
