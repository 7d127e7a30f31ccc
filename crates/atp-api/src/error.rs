//! API error types.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use atp_protocols::error::{ProviderError, ToolError};
use atp_protocols::toolkit::ExecuteResponse;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Toolkit not found: {0}")]
    ToolkitNotFound(String),

    #[error("Missing or invalid API key")]
    Unauthorized,

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Tool(e) => match e {
                ToolError::Validation(_) => StatusCode::BAD_REQUEST,
                ToolError::UnknownTool(_) => StatusCode::NOT_FOUND,
                ToolError::MissingRequiredParameter { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ToolError::HandlerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ToolError::HandlerTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
                ToolError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Provider(_) => StatusCode::BAD_REQUEST,
            Self::ToolkitNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Bind { .. } | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tool(e) => e.kind(),
            Self::Provider(ProviderError::UnsupportedProvider(_)) => "unsupported_provider",
            Self::Provider(_) => "malformed_payload",
            Self::ToolkitNotFound(_) => "toolkit_not_found",
            Self::Unauthorized => "unauthorized",
            Self::Bind { .. } | Self::Io(_) => "internal",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Tool(ToolError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ExecuteResponse::Failure {
            error: self.to_string(),
            kind: Some(self.kind().to_string()),
        };
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return (status, [(header::RETRY_AFTER, "1")], Json(body)).into_response();
        }
        (status, Json(body)).into_response()
    }
}
