//! Conversion between Anthropic content blocks and canonical tool calls.

use serde_json::{json, Value};
use tracing::debug;

use atp_protocols::error::ProviderError;
use atp_protocols::provider::{fallback_call_id, parse_arguments, ProviderAdapter};
use atp_protocols::tool::{CanonicalToolCall, CanonicalToolResult, ToolSchema};

use crate::api::{ApiTool, ToolResultBlock, ToolUse};

/// Adapter for Anthropic Messages payloads.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnthropicAdapter;

impl AnthropicAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// Flatten content blocks into tool_use entries.
///
/// A block is either a typed `tool_use` block or a wrapper carrying a
/// `tool_use` list. Text and other blocks are skipped.
fn collect_tool_uses<'a>(blocks: &'a [Value], out: &mut Vec<&'a Value>) {
    for block in blocks {
        if let Some(nested) = block.get("tool_use").and_then(Value::as_array) {
            out.extend(nested.iter());
            continue;
        }
        match block.get("type").and_then(Value::as_str) {
            None | Some("tool_use") => out.push(block),
            Some(_) => {}
        }
    }
}

fn tool_use_items(payload: &Value) -> Result<Vec<&Value>, ProviderError> {
    let mut items = Vec::new();
    match payload {
        Value::Array(blocks) => collect_tool_uses(blocks, &mut items),
        Value::Object(obj) => {
            if let Some(blocks) = obj.get("content").and_then(Value::as_array) {
                collect_tool_uses(blocks, &mut items);
            } else if let Some(uses) = obj.get("tool_use").and_then(Value::as_array) {
                items.extend(uses.iter());
            } else if obj.get("type").and_then(Value::as_str) == Some("tool_use") {
                items.push(payload);
            } else {
                return Err(ProviderError::MalformedPayload(
                    "expected content blocks or tool_use".to_string(),
                ));
            }
        }
        Value::Null => {}
        other => {
            return Err(ProviderError::MalformedPayload(format!(
                "expected an array or object, got {other}"
            )));
        }
    }
    Ok(items)
}

impl ProviderAdapter for AnthropicAdapter {
    fn id(&self) -> &str {
        "anthropic"
    }

    fn aliases(&self) -> &[&str] {
        &["claude"]
    }

    fn normalize_calls(&self, payload: &Value) -> Result<Vec<CanonicalToolCall>, ProviderError> {
        let items = tool_use_items(payload)?;
        debug!("Normalizing {} Anthropic tool_use blocks", items.len());

        items
            .into_iter()
            .map(|item| {
                let tool_use: ToolUse = serde_json::from_value(item.clone())
                    .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;
                let call_id = tool_use.id.unwrap_or_else(fallback_call_id);
                let arguments = parse_arguments(&call_id, tool_use.input.as_ref())?;
                Ok(CanonicalToolCall::new(call_id, tool_use.name, arguments))
            })
            .collect()
    }

    fn denormalize_results(&self, results: &[CanonicalToolResult]) -> Vec<Value> {
        results
            .iter()
            .map(|r| {
                let block = ToolResultBlock {
                    block_type: "tool_result",
                    tool_use_id: r.call_id.clone(),
                    content: r.content_text(),
                    is_error: r.is_error,
                };
                serde_json::to_value(block).unwrap_or(Value::Null)
            })
            .collect()
    }

    /// All `tool_result` blocks of a turn go back in one user message.
    fn follow_up_messages(&self, results: &[CanonicalToolResult]) -> Vec<Value> {
        if results.is_empty() {
            return Vec::new();
        }
        vec![json!({ "role": "user", "content": self.denormalize_results(results) })]
    }

    fn tool_schema(&self, tool: &ToolSchema) -> Value {
        let def = ApiTool {
            name: tool.name.clone(),
            description: tool.description.clone(),
            input_schema: tool.parameters_schema(),
        };
        serde_json::to_value(def).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
