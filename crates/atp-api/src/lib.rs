//! # ATP API
//!
//! Toolkit server exposing a [`ToolRegistry`](atp_core::ToolRegistry) over HTTP.
//!
//! ## Routes
//!
//! ```text
//! GET  /tools                               - Public tool schemas
//! POST /execute                             - Execute one tool call
//! GET  /toolkits/{id}/context?provider=...  - Provider-shaped schemas
//! GET  /toolkits/{id}/tools/{name}          - Execution route for one tool
//! GET  /health                              - Liveness and drain state
//! ```
//!
//! Execution failures use HTTP status to separate caller mistakes (4xx)
//! from handler failures (5xx). During a drain every route except
//! `/health` answers 503 so callers can back off and retry.

pub mod error;
pub mod executor;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use executor::ToolExecutor;
pub use http::routes::create_router;
pub use server::{DrainOutcome, ServerHandle, ToolKitServer};
pub use state::{AppState, InFlight, InFlightGuard};
