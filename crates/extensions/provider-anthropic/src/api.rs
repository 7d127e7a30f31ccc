//! Anthropic content block types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `tool_use` content block; `input` is a native mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolUse {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub input: Option<Value>,
}

/// `tool_result` content block sent back in the next user turn.
#[derive(Debug, Serialize)]
pub struct ToolResultBlock {
    #[serde(rename = "type")]
    pub block_type: &'static str,
    pub tool_use_id: String,
    pub content: String,
    pub is_error: bool,
}

/// Tool definition in the Messages API request.
#[derive(Debug, Serialize)]
pub struct ApiTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}
