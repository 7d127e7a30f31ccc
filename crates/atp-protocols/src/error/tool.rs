//! Tool registration and execution errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required parameter '{parameter}' for tool {tool}")]
    MissingRequiredParameter { tool: String, parameter: String },

    #[error("Handler error: {0}")]
    HandlerError(String),

    /// Elapsed budget in milliseconds.
    #[error("Handler timed out after {0} ms")]
    HandlerTimeout(u64),

    #[error("Toolkit unavailable: {0}")]
    Unavailable(String),
}

impl ToolError {
    /// Shorthand used by handler authors to fail a call.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::HandlerError(message.into())
    }

    /// Stable machine-readable kind, carried on the wire next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::UnknownTool(_) => "unknown_tool",
            Self::MissingRequiredParameter { .. } => "missing_required_parameter",
            Self::HandlerError(_) => "handler_error",
            Self::HandlerTimeout(_) => "handler_timeout",
            Self::Unavailable(_) => "unavailable",
        }
    }

    /// Whether the failure is the caller's fault rather than the handler's.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnknownTool(_) | Self::MissingRequiredParameter { .. }
        )
    }
}
