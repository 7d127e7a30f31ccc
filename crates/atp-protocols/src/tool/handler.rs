//! Tool handler trait and closure adapters.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolError;

/// Argument bag passed to a handler: parameter name to JSON value.
pub type ToolArguments = serde_json::Map<String, Value>;

/// Reserved argument key under which the caller's credential is injected.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Callable behind a registered tool.
///
/// The argument bag always contains [`AUTH_TOKEN_KEY`], `null` when the
/// caller supplied no credential.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: ToolArguments) -> Result<Value, ToolError>;
}

/// Handler backed by an async closure.
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(ToolArguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    async fn call(&self, arguments: ToolArguments) -> Result<Value, ToolError> {
        (self.f)(arguments).await
    }
}

/// Wrap an async closure as a handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

/// Handler backed by a blocking closure, run on the blocking thread pool.
pub struct BlockingFnHandler<F> {
    f: Arc<F>,
}

#[async_trait]
impl<F> ToolHandler for BlockingFnHandler<F>
where
    F: Fn(ToolArguments) -> Result<Value, ToolError> + Send + Sync + 'static,
{
    async fn call(&self, arguments: ToolArguments) -> Result<Value, ToolError> {
        let f = Arc::clone(&self.f);
        tokio::task::spawn_blocking(move || f(arguments))
            .await
            .map_err(|e| ToolError::HandlerError(format!("handler task failed: {e}")))?
    }
}

/// Wrap a blocking closure as a handler.
pub fn blocking_fn<F>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(ToolArguments) -> Result<Value, ToolError> + Send + Sync + 'static,
{
    Arc::new(BlockingFnHandler { f: Arc::new(f) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_async_closure_handler() {
        let handler = handler_fn(|args| async move {
            let name = args.get("name").and_then(Value::as_str).unwrap_or("World").to_string();
            Ok::<_, ToolError>(json!({ "message": format!("Hello, {name}!") }))
        });
        let mut args = ToolArguments::new();
        args.insert("name".into(), json!("Alice"));
        let out = handler.call(args).await.unwrap();
        assert_eq!(out["message"], "Hello, Alice!");
    }

    #[tokio::test]
    async fn test_blocking_closure_handler() {
        let handler = blocking_fn(|args| Ok(json!({ "count": args.len() })));
        let out = handler.call(ToolArguments::new()).await.unwrap();
        assert_eq!(out["count"], 0);
    }

    #[tokio::test]
    async fn test_blocking_handler_error_passes_through() {
        let handler = blocking_fn(|_| Err(ToolError::handler("bad key")));
        let err = handler.call(ToolArguments::new()).await.unwrap_err();
        assert_eq!(err, ToolError::HandlerError("bad key".to_string()));
    }

    #[tokio::test]
    async fn test_blocking_handler_panic_is_contained() {
        let handler = blocking_fn(|_| panic!("boom"));
        let err = handler.call(ToolArguments::new()).await.unwrap_err();
        assert!(matches!(err, ToolError::HandlerError(_)));
    }
}
