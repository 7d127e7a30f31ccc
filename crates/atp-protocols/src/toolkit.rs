//! Toolkit context and execution wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tool::{AuthType, ToolArguments};

/// Provider-shaped tool schemas for one conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolkitContext {
    pub toolkit_id: String,
    pub provider: String,
    #[serde(default)]
    pub tools: Vec<Value>,
    /// System-level guidance the backend wants prepended to the conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Where and how a toolkit tool is executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRoute {
    pub endpoint: String,
    #[serde(default)]
    pub auth_type: AuthType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_with: Option<String>,
}

/// Body of an execution request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: ToolArguments,
    #[serde(default)]
    pub auth_token: Option<String>,
}

/// Body of an execution response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecuteResponse {
    Success {
        result: Value,
    },
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
    },
}
