use super::*;
use atp_protocols::tool::{blocking_fn, handler_fn, ToolArguments, ToolDefinition};
use serde_json::json;

fn hello_world() -> ToolDefinition {
    ToolDefinition::new("hello_world", "Returns a greeting message.")
        .with_params(["name"])
        .with_required(["name"])
        .with_handler(handler_fn(|args: ToolArguments| async move {
            let name = args.get("name").and_then(Value::as_str).unwrap_or("World").to_string();
            Ok::<_, ToolError>(json!({ "message": format!("Hello, {name}!") }))
        }))
}

fn echo_args() -> ToolDefinition {
    ToolDefinition::new("echo", "Echoes its arguments")
        .with_params(["a"])
        .with_handler(handler_fn(|args: ToolArguments| async move {
            Ok::<_, ToolError>(Value::Object(args))
        }))
}

fn executor(timeout_ms: u64, tools: Vec<ToolDefinition>) -> ToolExecutor {
    let registry = Arc::new(ToolRegistry::new());
    for tool in tools {
        registry.register(tool).unwrap();
    }
    ToolExecutor::new(registry, Duration::from_millis(timeout_ms))
}

fn request(tool: &str, args: Value, token: Option<&str>) -> ExecuteRequest {
    ExecuteRequest {
        tool_name: tool.to_string(),
        arguments: serde_json::from_value(args).unwrap(),
        auth_token: token.map(str::to_string),
    }
}

#[tokio::test]
async fn test_hello_world_scenario() {
    let exec = executor(1000, vec![hello_world()]);

    let err = exec.execute(request("hello_world", json!({}), None)).await.unwrap_err();
    assert_eq!(
        err,
        ToolError::MissingRequiredParameter {
            tool: "hello_world".to_string(),
            parameter: "name".to_string(),
        }
    );

    let ok = exec
        .execute(request("hello_world", json!({ "name": "World" }), None))
        .await
        .unwrap();
    assert_eq!(ok["message"], "Hello, World!");
}

#[tokio::test]
async fn test_unknown_tool_checked_before_parameters() {
    let exec = executor(1000, vec![hello_world()]);
    let err = exec.execute(request("nope", json!({}), None)).await.unwrap_err();
    assert_eq!(err, ToolError::UnknownTool("nope".to_string()));
}

#[tokio::test]
async fn test_extra_arguments_and_token_injection() {
    let exec = executor(1000, vec![echo_args()]);
    let out = exec
        .execute(request("echo", json!({ "a": 1, "future_flag": true }), Some("sk-live")))
        .await
        .unwrap();
    assert_eq!(out["a"], 1);
    assert_eq!(out["future_flag"], true);
    assert_eq!(out[AUTH_TOKEN_KEY], "sk-live");

    let out = exec.execute(request("echo", json!({}), None)).await.unwrap();
    assert_eq!(out[AUTH_TOKEN_KEY], Value::Null);
}

#[tokio::test]
async fn test_injected_token_overrides_caller_argument() {
    let exec = executor(1000, vec![echo_args()]);
    let out = exec
        .execute(request("echo", json!({ "auth_token": "spoofed" }), Some("real")))
        .await
        .unwrap();
    assert_eq!(out[AUTH_TOKEN_KEY], "real");
}

#[tokio::test]
async fn test_handler_error_message_preserved() {
    let failing = ToolDefinition::new("fails", "always fails").with_handler(handler_fn(
        |_args: ToolArguments| async move { Err::<Value, _>(ToolError::handler("invalid api key")) },
    ));
    let exec = executor(1000, vec![failing]);
    let err = exec.execute(request("fails", json!({}), None)).await.unwrap_err();
    assert_eq!(err, ToolError::HandlerError("invalid api key".to_string()));
}

#[tokio::test]
async fn test_non_handler_errors_are_wrapped() {
    let failing = ToolDefinition::new("odd", "odd").with_handler(handler_fn(
        |_args: ToolArguments| async move { Err::<Value, _>(ToolError::UnknownTool("inner".into())) },
    ));
    let exec = executor(1000, vec![failing]);
    let err = exec.execute(request("odd", json!({}), None)).await.unwrap_err();
    assert!(matches!(err, ToolError::HandlerError(ref m) if m.contains("inner")));
}

#[tokio::test]
async fn test_handler_timeout() {
    let slow = ToolDefinition::new("slow", "sleeps").with_handler(handler_fn(
        |_args: ToolArguments| async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ToolError>(Value::Null)
        },
    ));
    let exec = executor(50, vec![slow]);
    let err = exec.execute(request("slow", json!({}), None)).await.unwrap_err();
    assert_eq!(err, ToolError::HandlerTimeout(50));
}

#[tokio::test]
async fn test_panicking_handler_does_not_crash() {
    let panics = ToolDefinition::new("panics", "panics").with_handler(handler_fn(
        |_args: ToolArguments| async move {
            if true {
                panic!("handler bug");
            }
            Ok::<_, ToolError>(Value::Null)
        },
    ));
    let exec = executor(1000, vec![panics, hello_world()]);
    let err = exec.execute(request("panics", json!({}), None)).await.unwrap_err();
    assert!(matches!(err, ToolError::HandlerError(_)));

    let ok = exec
        .execute(request("hello_world", json!({ "name": "after" }), None))
        .await
        .unwrap();
    assert_eq!(ok["message"], "Hello, after!");
}

#[tokio::test]
async fn test_blocking_handler() {
    let blocking = ToolDefinition::new("get_info", "info").with_handler(blocking_fn(|_| {
        Ok(json!({ "status": "running" }))
    }));
    let exec = executor(1000, vec![blocking]);
    let out = exec.execute(request("get_info", json!({}), None)).await.unwrap();
    assert_eq!(out["status"], "running");
}
