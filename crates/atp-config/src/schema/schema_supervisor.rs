//! Auto-restart supervisor configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Which change-notification source backs the watcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatcherKind {
    /// Native file-system events.
    #[default]
    Notify,
    /// Modification-time polling.
    Poll,
}

/// How the host comes back after a drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartMode {
    /// Replace the process image with a fresh run of the same executable.
    #[default]
    Exec,
    /// Re-run tool registration and rebind inside the current process.
    InProcess,
}

/// Supervisor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    #[serde(default = "default_true")]
    pub auto_restart: bool,

    #[serde(default = "default_watch_paths")]
    pub watch_paths: Vec<PathBuf>,

    /// File extensions that count as source changes. Empty means all files.
    #[serde(default = "default_watch_extensions")]
    pub watch_extensions: Vec<String>,

    #[serde(default)]
    pub watcher: WatcherKind,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    #[serde(default = "default_grace_period")]
    pub grace_period_secs: u64,

    #[serde(default)]
    pub restart_mode: RestartMode,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            auto_restart: true,
            watch_paths: default_watch_paths(),
            watch_extensions: default_watch_extensions(),
            watcher: WatcherKind::default(),
            poll_interval_ms: default_poll_interval(),
            debounce_ms: default_debounce(),
            grace_period_secs: default_grace_period(),
            restart_mode: RestartMode::default(),
        }
    }
}

impl SupervisorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}

fn default_watch_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("src")]
}

fn default_watch_extensions() -> Vec<String> {
    vec!["rs".to_string(), "toml".to_string()]
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_debounce() -> u64 {
    500
}

fn default_grace_period() -> u64 {
    10
}
