//! Provider adapter trait definition.

use serde_json::Value;

use crate::error::ProviderError;
use crate::tool::{CanonicalToolCall, CanonicalToolResult, ToolSchema};

/// Stateless conversion between one provider's shapes and the canonical form.
pub trait ProviderAdapter: Send + Sync {
    /// Canonical provider id, e.g. `openai`.
    fn id(&self) -> &str;

    /// Alternative names that resolve to this adapter.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Extract tool calls from a provider payload, preserving their order.
    ///
    /// The payload may be the bare call list or the provider's full response.
    fn normalize_calls(&self, payload: &Value) -> Result<Vec<CanonicalToolCall>, ProviderError>;

    /// Shape results as the provider's follow-up message fragments, one per result.
    fn denormalize_results(&self, results: &[CanonicalToolResult]) -> Vec<Value>;

    /// Shape results as whole conversation messages, ready to append after
    /// the assistant turn that made the calls.
    fn follow_up_messages(&self, results: &[CanonicalToolResult]) -> Vec<Value> {
        self.denormalize_results(results)
    }

    /// Shape a tool schema the way the provider's request expects it.
    fn tool_schema(&self, tool: &ToolSchema) -> Value;
}
