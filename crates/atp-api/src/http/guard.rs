//! Request guards applied ahead of every handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use atp_protocols::error::ToolError;

use crate::error::ApiError;
use crate::state::AppState;

const HEALTH_PATH: &str = "/health";

/// Reject requests while draining, then enforce the API key.
pub async fn guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().path() == HEALTH_PATH {
        return next.run(request).await;
    }

    if state.is_draining() {
        debug!("Rejecting {} while draining", request.uri().path());
        return ApiError::from(ToolError::Unavailable("toolkit is restarting".to_string()))
            .into_response();
    }

    if let Some(expected) = state.api_key() {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented != Some(expected) {
            return ApiError::Unauthorized.into_response();
        }
    }

    state.increment_requests();
    next.run(request).await
}
