//! Provider payload errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Malformed arguments for call {call_id}: {message}")]
    MalformedArguments { call_id: String, message: String },

    #[error("Malformed tool-call payload: {0}")]
    MalformedPayload(String),
}
