//! Collaborator seams.
//!
//! The dispatcher and OAuth connector talk to remote services only through
//! these traits. [`HttpBackend`](crate::http::HttpBackend) implements all of
//! them over HTTP.

use async_trait::async_trait;
use serde_json::Value;

use atp_protocols::error::AtpError;
use atp_protocols::oauth::{AuthorizationUrl, ConnectionStatus};
use atp_protocols::toolkit::{ExecuteRequest, ToolRoute, ToolkitContext};

/// Resolves toolkits to schemas and tools to execution routes.
#[async_trait]
pub trait ToolkitBackend: Send + Sync {
    /// Tool schemas of `toolkit_id` shaped for `provider`.
    async fn context(
        &self,
        toolkit_id: &str,
        provider: &str,
        user_prompt: Option<&str>,
    ) -> Result<ToolkitContext, AtpError>;

    /// Where and how `tool_name` of `toolkit_id` is executed.
    async fn resolve(&self, toolkit_id: &str, tool_name: &str) -> Result<ToolRoute, AtpError>;
}

/// Executes one call against a resolved route.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(&self, route: &ToolRoute, request: &ExecuteRequest) -> Result<Value, AtpError>;
}

/// Delegated authorization backend.
#[async_trait]
pub trait OAuthBackend: Send + Sync {
    async fn initiate(
        &self,
        platform_id: &str,
        external_user_id: &str,
    ) -> Result<AuthorizationUrl, AtpError>;

    async fn status(
        &self,
        platform_id: &str,
        external_user_id: &str,
    ) -> Result<ConnectionStatus, AtpError>;
}
