//! Authorization errors.

use thiserror::Error;

use crate::oauth::SessionStatus;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No authorized connection for user {external_user_id} on platform {platform_id}")]
    AuthNotEstablished {
        platform_id: String,
        external_user_id: String,
    },

    #[error("Platform not found: {0}")]
    PlatformNotFound(String),

    #[error("OAuth connection not established after {waited_secs} seconds ({polls} polls)")]
    OAuthTimeout { waited_secs: u64, polls: u32 },

    #[error("OAuth connection ended with status {0}")]
    OAuthFailed(SessionStatus),

    #[error("Waiting for OAuth connection was cancelled")]
    Cancelled,
}
