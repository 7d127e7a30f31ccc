//! Supervisor errors.

use thiserror::Error;

use atp_api::ApiError;

/// Supervisor error types.
///
/// `Launch` and `Relaunch` end the host; the rest are logged by the watch
/// loop, which keeps running.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Failed to launch toolkit server: {0}")]
    Launch(#[from] ApiError),

    #[error("Failed to re-exec host process: {0}")]
    Relaunch(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Signal setup failed: {0}")]
    Signal(String),

    #[error("Host is not running")]
    NotRunning,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SupervisorError {
    /// Whether the host must stop because of this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Launch(_) | Self::Relaunch(_))
    }
}

impl From<notify::Error> for SupervisorError {
    fn from(err: notify::Error) -> Self {
        Self::Watch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(SupervisorError::Relaunch("ENOENT".into()).is_fatal());
        assert!(SupervisorError::Launch(ApiError::Unauthorized).is_fatal());
        assert!(!SupervisorError::Watch("gone".into()).is_fatal());
        assert!(!SupervisorError::Io(std::io::Error::other("x")).is_fatal());
    }
}
