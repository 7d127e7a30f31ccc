//! Mistral tool-call wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool call as emitted in `choices[0].message.tool_calls`.
///
/// The SDKs emit either a flat `{name, arguments}` or an OpenAI-style
/// `function` wrapper; arguments may be a mapping or a JSON string.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<Value>,
    #[serde(default)]
    pub function: Option<FunctionCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Tool-role message carrying one result.
#[derive(Debug, Serialize)]
pub struct ToolMessage {
    pub role: &'static str,
    pub tool_call_id: String,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ApiTool {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: FunctionDef,
}

#[derive(Debug, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}
