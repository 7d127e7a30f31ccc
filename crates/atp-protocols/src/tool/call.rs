//! Canonical tool calls and results.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ToolArguments;

/// One model-requested tool invocation, independent of provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalToolCall {
    /// Opaque id, unique within one model turn.
    pub call_id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: ToolArguments,
}

impl CanonicalToolCall {
    pub fn new(call_id: impl Into<String>, name: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Outcome of one canonical call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalToolResult {
    /// Echoes the originating call's id.
    pub call_id: String,
    pub name: String,
    pub content: Value,
    #[serde(default)]
    pub is_error: bool,
}

impl CanonicalToolResult {
    /// Successful result for `call`.
    pub fn success(call: &CanonicalToolCall, content: Value) -> Self {
        Self {
            call_id: call.call_id.clone(),
            name: call.name.clone(),
            content,
            is_error: false,
        }
    }

    /// Error result for `call`, with content `{"error": message}`.
    pub fn failure(call: &CanonicalToolCall, message: impl Into<String>) -> Self {
        Self {
            call_id: call.call_id.clone(),
            name: call.name.clone(),
            content: json!({ "error": message.into() }),
            is_error: true,
        }
    }

    /// Content rendered as text for providers that only accept strings.
    pub fn content_text(&self) -> String {
        match &self.content {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
