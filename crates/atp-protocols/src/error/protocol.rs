//! Top-level ATP error type.

use thiserror::Error;

use super::{AuthError, ProviderError, ToolError, TransportError};

/// Top-level error type returned by client-facing operations.
#[derive(Debug, Error)]
pub enum AtpError {
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AtpError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::Tool(ToolError::Unavailable(_)) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_from() {
        let err = AtpError::from(ToolError::UnknownTool("nope".to_string()));
        assert!(err.to_string().contains("Tool error"));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_provider_error_from() {
        let err = AtpError::from(ProviderError::UnsupportedProvider("x".to_string()));
        assert!(err.to_string().contains("Provider error"));
    }

    #[test]
    fn test_auth_error_from() {
        let err = AtpError::from(AuthError::PlatformNotFound("p".to_string()));
        assert!(err.to_string().contains("Auth error"));
    }

    #[test]
    fn test_serialization_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err = AtpError::from(json_err);
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_retryable() {
        assert!(AtpError::from(TransportError::Network("reset".into())).is_retryable());
        assert!(AtpError::from(ToolError::Unavailable("draining".into())).is_retryable());
        assert!(!AtpError::from(ToolError::HandlerTimeout(5)).is_retryable());
    }
}
