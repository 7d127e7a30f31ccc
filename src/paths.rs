//! Well-known paths.

use std::path::PathBuf;

/// Get the .atp directory path.
pub(crate) fn atp_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".atp"))
        .unwrap_or_else(|| PathBuf::from(".atp"))
}

/// Directory for rolling log files.
pub(crate) fn log_dir() -> PathBuf {
    atp_dir().join("logs")
}
