//! Conversion between Mistral shapes and canonical tool calls.

use serde_json::Value;
use tracing::debug;

use atp_protocols::error::ProviderError;
use atp_protocols::provider::{fallback_call_id, parse_arguments, ProviderAdapter};
use atp_protocols::tool::{CanonicalToolCall, CanonicalToolResult, ToolSchema};

use crate::api::{ApiTool, FunctionDef, ToolCall, ToolMessage};

/// Adapter for Mistral chat payloads.
#[derive(Debug, Default, Clone, Copy)]
pub struct MistralAdapter;

impl MistralAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn call_items(payload: &Value) -> Result<Vec<&Value>, ProviderError> {
    match payload {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(obj) => {
            if let Some(choices) = obj.get("choices") {
                Ok(choices
                    .get(0)
                    .and_then(|c| c.get("message"))
                    .and_then(|m| m.get("tool_calls"))
                    .and_then(Value::as_array)
                    .map(|calls| calls.iter().collect())
                    .unwrap_or_default())
            } else if let Some(calls) = obj.get("tool_calls") {
                Ok(calls.as_array().map(|c| c.iter().collect()).unwrap_or_default())
            } else {
                Err(ProviderError::MalformedPayload(
                    "expected tool_calls or choices".to_string(),
                ))
            }
        }
        Value::Null => Ok(Vec::new()),
        other => Err(ProviderError::MalformedPayload(format!(
            "expected an array or object, got {other}"
        ))),
    }
}

fn to_canonical(item: &Value) -> Result<CanonicalToolCall, ProviderError> {
    let call: ToolCall = serde_json::from_value(item.clone())
        .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;

    let (name, arguments) = match (call.name, call.function) {
        (Some(name), _) => (name, call.arguments),
        (None, Some(function)) => (function.name, function.arguments),
        (None, None) => {
            return Err(ProviderError::MalformedPayload(
                "tool call has neither name nor function".to_string(),
            ));
        }
    };
    let call_id = call.id.unwrap_or_else(fallback_call_id);
    let arguments = parse_arguments(&call_id, arguments.as_ref())?;
    Ok(CanonicalToolCall::new(call_id, name, arguments))
}

impl ProviderAdapter for MistralAdapter {
    fn id(&self) -> &str {
        "mistral"
    }

    fn aliases(&self) -> &[&str] {
        &["mistralai"]
    }

    fn normalize_calls(&self, payload: &Value) -> Result<Vec<CanonicalToolCall>, ProviderError> {
        let items = call_items(payload)?;
        debug!("Normalizing {} Mistral tool calls", items.len());
        items.into_iter().map(to_canonical).collect()
    }

    fn denormalize_results(&self, results: &[CanonicalToolResult]) -> Vec<Value> {
        results
            .iter()
            .map(|r| {
                let message = ToolMessage {
                    role: "tool",
                    tool_call_id: r.call_id.clone(),
                    name: r.name.clone(),
                    content: r.content_text(),
                };
                serde_json::to_value(message).unwrap_or(Value::Null)
            })
            .collect()
    }

    fn tool_schema(&self, tool: &ToolSchema) -> Value {
        let def = ApiTool {
            tool_type: "function",
            function: FunctionDef {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters_schema(),
            },
        };
        serde_json::to_value(def).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
