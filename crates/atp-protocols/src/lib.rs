//! # ATP Protocols
//!
//! Canonical types and seams shared by every Agent Tool Protocol crate.
//! Contains definitions only; registries, servers and clients live elsewhere.
//!
//! ## Core Traits
//!
//! - [`ToolHandler`] - Callable behind a registered tool
//! - [`ProviderAdapter`] - Provider-specific tool-call and result shaping
//!
//! ## Canonical Types
//!
//! - [`CanonicalToolCall`] / [`CanonicalToolResult`] - One model turn's calls and results
//! - [`ToolkitContext`] - Provider-shaped tool schemas for one turn
//! - [`OAuthSession`] - Delegated authorization state for a platform/user pair

pub mod error;
pub mod oauth;
pub mod provider;
pub mod tool;
pub mod toolkit;

pub use error::{AtpError, AuthError, ProviderError, ToolError, TransportError};
pub use oauth::{AuthorizationUrl, ConnectionStatus, OAuthSession, SessionStatus};
pub use provider::ProviderAdapter;
pub use tool::{
    AuthType, CanonicalToolCall, CanonicalToolResult, ToolArguments, ToolDefinition, ToolHandler,
    ToolSchema, AUTH_TOKEN_KEY,
};
pub use toolkit::{ExecuteRequest, ExecuteResponse, ToolRoute, ToolkitContext};
