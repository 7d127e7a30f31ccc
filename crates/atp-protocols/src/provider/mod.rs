//! Provider adapter protocol.
//!
//! Each model provider nests tool calls and expects tool results in its own
//! shape. An adapter converts between that shape and the canonical types.

mod traits;

pub use traits::*;

use serde_json::Value;

use crate::error::ProviderError;
use crate::tool::ToolArguments;

/// Decode a call's arguments.
///
/// Accepts a JSON-encoded object string, a native object, or nothing.
pub fn parse_arguments(call_id: &str, raw: Option<&Value>) -> Result<ToolArguments, ProviderError> {
    let malformed = |message: String| ProviderError::MalformedArguments {
        call_id: call_id.to_string(),
        message,
    };

    match raw {
        None | Some(Value::Null) => Ok(ToolArguments::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(ToolArguments::new()),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(malformed(format!("expected a JSON object, got {other}"))),
            Err(e) => Err(malformed(e.to_string())),
        },
        Some(other) => Err(malformed(format!("expected a JSON object, got {other}"))),
    }
}

/// Id for a call whose provider payload carried none.
pub fn fallback_call_id() -> String {
    format!("call_{}", uuid::Uuid::new_v4().simple())
}
