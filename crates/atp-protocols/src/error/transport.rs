//! Transport errors talking to collaborators.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request never reached the peer.
    #[error("Network error: {0}")]
    Network(String),

    /// The request may have been delivered but no response arrived in time.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The connection failed after the request was sent.
    #[error("Connection interrupted: {0}")]
    Interrupted(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Whether a caller should back off and try again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            Self::Timeout(_) | Self::Interrupted(_) | Self::Decode(_) => false,
        }
    }
}
