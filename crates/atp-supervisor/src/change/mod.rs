//! Change-notification sources.
//!
//! A [`ChangeSource`] reports batches of changed paths under the watched
//! roots. The supervisor only sees the batches, so native file events and
//! modification-time polling are interchangeable.

mod notify_source;
mod poll_source;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use atp_config::{ConfigLoader, SupervisorConfig, WatcherKind};

use crate::error::SupervisorError;

pub use notify_source::NotifyChangeSource;
pub use poll_source::PollingChangeSource;

/// A stream of source changes.
#[async_trait]
pub trait ChangeSource: Send {
    /// Wait for the next batch of changed paths. `None` once the source is closed.
    async fn next_change(&mut self) -> Option<Vec<PathBuf>>;
}

/// Decides which paths count as source changes.
#[derive(Debug, Clone, Default)]
pub struct ChangeFilter {
    extensions: Vec<String>,
}

impl ChangeFilter {
    /// Empty `extensions` accepts every file.
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        let hidden_or_build = path.components().any(|c| {
            let name = c.as_os_str().to_string_lossy();
            name == "target" || (name.starts_with('.') && name != "." && name != "..")
        });
        if hidden_or_build {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }

    /// [`matches`](Self::matches) applied to the part of `path` below the
    /// deepest root containing it, so hidden or build directories above a
    /// root never filter out its files.
    pub fn matches_under(&self, roots: &[PathBuf], path: &Path) -> bool {
        let relative = roots
            .iter()
            .filter_map(|root| path.strip_prefix(root).ok())
            .min_by_key(|rest| rest.components().count())
            .unwrap_or(path);
        self.matches(relative)
    }
}

/// Build the change source selected by the configuration.
///
/// `~` in watch paths expands to the home directory.
pub fn from_config(config: &SupervisorConfig) -> Result<Box<dyn ChangeSource>, SupervisorError> {
    let filter = ChangeFilter::new(&config.watch_extensions);
    let roots: Vec<PathBuf> = config
        .watch_paths
        .iter()
        .map(|p| PathBuf::from(ConfigLoader::expand_path(&p.to_string_lossy())))
        .collect();
    let source: Box<dyn ChangeSource> = match config.watcher {
        WatcherKind::Notify => Box::new(NotifyChangeSource::new(&roots, filter)?),
        WatcherKind::Poll => Box::new(PollingChangeSource::new(
            &roots,
            filter,
            config.poll_interval(),
        )),
    };
    Ok(source)
}

/// Wait for a change, then keep collecting until `quiet` passes without one.
///
/// Returns the de-duplicated paths of the whole burst, or `None` if the
/// source closed before any change arrived.
pub async fn next_settled(source: &mut dyn ChangeSource, quiet: Duration) -> Option<Vec<PathBuf>> {
    let mut paths: BTreeSet<PathBuf> = source.next_change().await?.into_iter().collect();

    loop {
        match tokio::time::timeout(quiet, source.next_change()).await {
            Ok(Some(more)) => paths.extend(more),
            Ok(None) | Err(_) => break,
        }
    }

    Some(paths.into_iter().collect())
}
