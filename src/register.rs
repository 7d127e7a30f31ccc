//! Demo toolkit registration.

use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use atp_core::ToolRegistry;
use atp_protocols::error::ToolError;
use atp_protocols::tool::{handler_fn, ToolArguments, ToolDefinition};

/// Register the demo tools, in a fixed order so every generation serves the same catalog.
pub(crate) fn register_demo_tools(registry: &ToolRegistry, auto_restart: bool) -> Result<(), ToolError> {
    registry.register(
        ToolDefinition::new("hello_world", "Returns a greeting message.")
            .with_params(["name"])
            .with_required(["name"])
            .with_handler(handler_fn(|args: ToolArguments| async move {
                let name = args.get("name").and_then(Value::as_str).unwrap_or_default();
                Ok::<_, ToolError>(json!({
                    "message": format!("Hello, {name}!"),
                    "timestamp": Utc::now().to_rfc3339(),
                }))
            })),
    )?;

    registry.register(
        ToolDefinition::new("get_info", "Reports the toolkit server status.").with_handler(handler_fn(
            move |_args: ToolArguments| async move {
                Ok::<_, ToolError>(json!({
                    "status": "running",
                    "auto_restart": auto_restart,
                    "timestamp": Utc::now().to_rfc3339(),
                }))
            },
        )),
    )?;

    info!("Registered {} demo tools", registry.len());
    Ok(())
}
