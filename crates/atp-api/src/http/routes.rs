//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::http::guard::guard;
use crate::http::handlers::{execute_tool, health, list_tools, resolve_tool, toolkit_context};
use crate::state::AppState;

/// Create the toolkit router.
pub fn create_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    let toolkit_routes = Router::new()
        .route("/{toolkit_id}/context", get(toolkit_context))
        .route("/{toolkit_id}/tools/{tool_name}", get(resolve_tool));

    Router::new()
        .route("/tools", get(list_tools))
        .route("/execute", post(execute_tool))
        .route("/health", get(health))
        .nest("/toolkits", toolkit_routes)
        .layer(middleware::from_fn_with_state(state.clone(), guard))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
