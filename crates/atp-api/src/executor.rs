//! Validated, time-bounded tool execution.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::time::timeout;
use tracing::{error, info, warn};

use atp_core::ToolRegistry;
use atp_protocols::error::ToolError;
use atp_protocols::tool::AUTH_TOKEN_KEY;
use atp_protocols::toolkit::ExecuteRequest;

/// Executes tool calls against a registry.
#[derive(Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one call.
    ///
    /// Checks the tool exists, then that every required parameter is present.
    /// Unknown extra arguments pass through. The caller's token is injected
    /// under [`AUTH_TOKEN_KEY`] whatever the tool's auth type.
    pub async fn execute(&self, request: ExecuteRequest) -> Result<Value, ToolError> {
        let tool = self.registry.lookup(&request.tool_name)?;

        if let Some(missing) = tool
            .schema
            .required_parameters
            .iter()
            .find(|p| !request.arguments.contains_key(p.as_str()))
        {
            return Err(ToolError::MissingRequiredParameter {
                tool: request.tool_name,
                parameter: missing.clone(),
            });
        }

        let handler = tool.handler.clone().ok_or_else(|| {
            ToolError::Validation(format!("tool {} has no handler", request.tool_name))
        })?;

        let mut arguments = request.arguments;
        arguments.insert(
            AUTH_TOKEN_KEY.to_string(),
            request.auth_token.map(Value::String).unwrap_or(Value::Null),
        );

        let started = Instant::now();
        let task = tokio::spawn(async move { handler.call(arguments).await });
        let abort = task.abort_handle();

        let outcome = match timeout(self.timeout, task).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(ToolError::HandlerError(message)))) => Err(ToolError::HandlerError(message)),
            Ok(Ok(Err(other))) => Err(ToolError::HandlerError(other.to_string())),
            Ok(Err(join_err)) if join_err.is_panic() => {
                error!("Tool {} panicked", request.tool_name);
                Err(ToolError::handler("handler panicked"))
            }
            Ok(Err(_)) => Err(ToolError::handler("handler was cancelled")),
            Err(_) => {
                abort.abort();
                warn!(
                    "Tool {} timed out after {:?}",
                    request.tool_name, self.timeout
                );
                Err(ToolError::HandlerTimeout(self.timeout.as_millis() as u64))
            }
        };

        info!(
            tool = %request.tool_name,
            ok = outcome.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tool executed"
        );
        outcome
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
