//! Conversion between OpenAI shapes and canonical tool calls.

use serde_json::Value;
use tracing::debug;

use atp_protocols::error::ProviderError;
use atp_protocols::provider::{fallback_call_id, parse_arguments, ProviderAdapter};
use atp_protocols::tool::{CanonicalToolCall, CanonicalToolResult, ToolSchema};

use crate::api::{FunctionCallOutput, FunctionTool, RawCall};

/// Adapter for OpenAI Chat Completions and Responses payloads.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAIAdapter;

impl OpenAIAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// Locate the raw call list inside whatever the caller handed us.
fn call_items(payload: &Value) -> Result<Vec<&Value>, ProviderError> {
    let items: Vec<&Value> = match payload {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => {
            if let Some(choices) = obj.get("choices") {
                choices
                    .get(0)
                    .and_then(|c| c.get("message"))
                    .and_then(|m| m.get("tool_calls"))
                    .and_then(Value::as_array)
                    .map(|calls| calls.iter().collect())
                    .unwrap_or_default()
            } else if let Some(calls) = obj.get("tool_calls").and_then(Value::as_array) {
                calls.iter().collect()
            } else if let Some(output) = obj.get("output").and_then(Value::as_array) {
                output.iter().collect()
            } else {
                return Err(ProviderError::MalformedPayload(
                    "expected tool_calls, choices or output".to_string(),
                ));
            }
        }
        Value::Null => Vec::new(),
        other => {
            return Err(ProviderError::MalformedPayload(format!(
                "expected an array or object, got {other}"
            )));
        }
    };

    // Responses output interleaves messages and reasoning with function calls.
    Ok(items
        .into_iter()
        .filter(|item| {
            match item.get("type").and_then(Value::as_str) {
                None | Some("function") | Some("function_call") => true,
                Some(_) => false,
            }
        })
        .collect())
}

impl ProviderAdapter for OpenAIAdapter {
    fn id(&self) -> &str {
        "openai"
    }

    fn normalize_calls(&self, payload: &Value) -> Result<Vec<CanonicalToolCall>, ProviderError> {
        let items = call_items(payload)?;
        debug!("Normalizing {} OpenAI tool calls", items.len());

        items
            .into_iter()
            .map(|item| {
                let raw: RawCall = serde_json::from_value(item.clone())
                    .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;
                let (call_id, name, arguments) = match raw {
                    RawCall::Chat(call) => (call.id, call.function.name, call.function.arguments),
                    RawCall::Response(item) => (item.call_id.or(item.id), item.name, item.arguments),
                };
                let call_id = call_id.unwrap_or_else(fallback_call_id);
                let arguments = parse_arguments(&call_id, arguments.as_ref())?;
                Ok(CanonicalToolCall::new(call_id, name, arguments))
            })
            .collect()
    }

    fn denormalize_results(&self, results: &[CanonicalToolResult]) -> Vec<Value> {
        results
            .iter()
            .map(|r| {
                let output = FunctionCallOutput {
                    output_type: "function_call_output",
                    call_id: r.call_id.clone(),
                    output: r.content_text(),
                };
                serde_json::to_value(output).unwrap_or(Value::Null)
            })
            .collect()
    }

    fn tool_schema(&self, tool: &ToolSchema) -> Value {
        let def = FunctionTool {
            tool_type: "function",
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: tool.parameters_schema(),
        };
        serde_json::to_value(def).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
