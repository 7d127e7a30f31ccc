//! OpenAI tool-call wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat Completions tool call.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: FunctionCall,
}

/// Function call details; `arguments` is a JSON-encoded string.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Responses API `function_call` output item.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCallItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub call_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Either call representation OpenAI emits.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCall {
    Chat(ToolCall),
    Response(FunctionCallItem),
}

/// Follow-up item carrying one tool result.
#[derive(Debug, Serialize)]
pub struct FunctionCallOutput {
    #[serde(rename = "type")]
    pub output_type: &'static str,
    pub call_id: String,
    pub output: String,
}

/// Tool definition in the Responses API request.
#[derive(Debug, Serialize)]
pub struct FunctionTool {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub name: String,
    pub description: String,
    pub parameters: Value,
}
