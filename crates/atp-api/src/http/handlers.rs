//! Toolkit handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use atp_protocols::error::ToolError;
use atp_protocols::tool::ToolSchema;
use atp_protocols::toolkit::{ExecuteRequest, ExecuteResponse, ToolRoute, ToolkitContext};

use crate::error::ApiError;
use crate::state::AppState;

/// Schema listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolListResponse {
    pub toolkit_id: String,
    pub tools: Vec<ToolSchema>,
}

/// Query for the context route.
#[derive(Debug, Deserialize)]
pub struct ContextQuery {
    pub provider: String,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

/// List public tool schemas in registration order.
pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ToolListResponse> {
    Json(ToolListResponse {
        toolkit_id: state.app_name.clone(),
        tools: state.registry.schemas(),
    })
}

/// Execute one tool call. An unreadable body is a validation error.
pub async fn execute_tool(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let Json(request) = request?;
    let _guard = state.in_flight().enter();
    let result = state.executor.execute(request).await?;
    Ok(Json(ExecuteResponse::Success { result }))
}

fn ensure_toolkit(state: &AppState, toolkit_id: &str) -> Result<(), ApiError> {
    if toolkit_id == state.app_name {
        Ok(())
    } else {
        Err(ApiError::ToolkitNotFound(toolkit_id.to_string()))
    }
}

/// Tool schemas shaped for one provider.
pub async fn toolkit_context(
    State(state): State<Arc<AppState>>,
    Path(toolkit_id): Path<String>,
    Query(query): Query<ContextQuery>,
) -> Result<Json<ToolkitContext>, ApiError> {
    ensure_toolkit(&state, &toolkit_id)?;
    let adapter = state.providers.resolve(&query.provider)?;
    debug!(
        "Building {} context for toolkit {} (prompt: {})",
        adapter.id(),
        toolkit_id,
        query.user_prompt.is_some()
    );

    let tools = state
        .registry
        .schemas()
        .iter()
        .map(|schema| adapter.tool_schema(schema))
        .collect();

    Ok(Json(ToolkitContext {
        toolkit_id,
        provider: adapter.id().to_string(),
        tools,
        instructions: None,
    }))
}

/// Execution route for one tool of this toolkit.
pub async fn resolve_tool(
    State(state): State<Arc<AppState>>,
    Path((toolkit_id, tool_name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<ToolRoute>, ApiError> {
    ensure_toolkit(&state, &toolkit_id)?;
    let tool = state
        .registry
        .get(&tool_name)
        .ok_or(ApiError::Tool(ToolError::UnknownTool(tool_name)))?;

    let base = match state.public_url() {
        Some(url) => url.to_string(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("127.0.0.1");
            format!("http://{host}")
        }
    };

    Ok(Json(ToolRoute {
        endpoint: format!("{base}/execute"),
        auth_type: tool.schema.auth_type,
        auth_provider: tool.schema.auth_provider.clone(),
        auth_with: tool.schema.auth_with.clone(),
    }))
}

/// Liveness and drain state.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let draining = state.is_draining();
    let status = if draining {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (
        status,
        Json(json!({
            "status": if draining { "draining" } else { "ok" },
            "toolkit_id": state.app_name,
            "tools": state.registry.len(),
            "in_flight": state.in_flight().count(),
            "requests": state.request_count(),
            "uptime_secs": state.uptime().as_secs(),
        })),
    )
}
