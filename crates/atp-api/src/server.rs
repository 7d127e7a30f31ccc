//! Toolkit server lifecycle.
//!
//! [`ToolKitServer::spawn`] binds and serves in a background task and hands
//! back a [`ServerHandle`]. Dropping the handle does not stop the server;
//! call [`ServerHandle::drain`] to stop accepting work and let in-flight
//! executions finish within a grace period.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use atp_config::ServerConfig;
use atp_core::{ProviderRegistry, ToolRegistry};

use crate::error::ApiError;
use crate::http::routes::create_router;
use crate::state::AppState;

/// Serves one toolkit's registry over HTTP.
pub struct ToolKitServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ToolKitServer {
    pub fn new(
        config: ServerConfig,
        registry: Arc<ToolRegistry>,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        let state = Arc::new(AppState::new(&config, registry, providers));
        Self { config, state }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Configured bind address.
    pub fn addr(&self) -> String {
        self.config.bind_addr()
    }

    /// Bind the listener and serve in the background.
    pub async fn spawn(self) -> Result<ServerHandle, ApiError> {
        let addr = self.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ApiError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let app = create_router(self.state.clone(), self.config.max_body_bytes);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let join = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    if shutdown_rx.await.is_err() {
                        std::future::pending::<()>().await;
                    }
                })
                .await
        });

        info!(
            "Toolkit {} listening on {} ({} tools)",
            self.state.app_name,
            local_addr,
            self.state.registry.len()
        );

        Ok(ServerHandle {
            local_addr,
            state: self.state,
            shutdown_tx: Some(shutdown_tx),
            join,
        })
    }

    /// Serve until the server stops on its own.
    pub async fn run(self) -> Result<(), ApiError> {
        self.spawn().await?.wait().await
    }
}

/// Result of a drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainOutcome {
    /// Every in-flight execution finished within the grace period.
    pub completed: bool,
    /// Executions still running when the grace period ran out.
    pub abandoned: usize,
}

/// Running server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    state: Arc<AppState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `http://` base URL of the bound listener.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Stop accepting work and wait up to `grace` for in-flight executions.
    ///
    /// New requests get a retryable 503 as soon as this is called. Work
    /// still running after `grace` is abandoned and the serve task aborted.
    pub async fn drain(mut self, grace: Duration) -> DrainOutcome {
        self.state.begin_drain();
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let in_flight = self.state.in_flight().clone();
        let completed = in_flight.wait_idle(grace).await;
        let abandoned = in_flight.count();
        if !completed {
            warn!("Drain grace expired with {} executions in flight", abandoned);
        }

        let stop_wait = if completed { grace } else { Duration::ZERO };
        let joined = tokio::time::timeout(stop_wait, &mut self.join).await;
        match joined {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => warn!("Toolkit server exited with error: {}", e),
            Ok(Err(e)) => warn!("Toolkit server task failed: {}", e),
            Err(_) => self.join.abort(),
        }

        info!(
            "Toolkit {} drained (completed: {}, abandoned: {})",
            self.state.app_name, completed, abandoned
        );
        DrainOutcome {
            completed,
            abandoned,
        }
    }

    /// Wait for the serve task to finish.
    pub async fn wait(self) -> Result<(), ApiError> {
        match self.join.await {
            Ok(result) => result.map_err(ApiError::from),
            Err(e) => Err(ApiError::Io(std::io::Error::other(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atp_protocols::error::ToolError;
    use atp_protocols::tool::{handler_fn, ToolArguments, ToolDefinition};
    use serde_json::{json, Value};

    fn server(port: u16) -> ToolKitServer {
        let registry = Arc::new(ToolRegistry::new());
        registry
            .register(
                ToolDefinition::new("wait", "Sleeps for `ms` milliseconds")
                    .with_params(["ms"])
                    .with_parameter_schema("ms", json!({ "type": "integer" }))
                    .with_handler(handler_fn(|args: ToolArguments| async move {
                        let ms = args.get("ms").and_then(Value::as_u64).unwrap_or(0);
                        tokio::time::sleep(Duration::from_millis(ms)).await;
                        Ok::<_, ToolError>(json!({ "slept": ms }))
                    })),
            )
            .unwrap();
        let config = ServerConfig {
            port,
            app_name: "drain".into(),
            ..ServerConfig::default()
        };
        ToolKitServer::new(config, registry, Arc::new(ProviderRegistry::new()))
    }

    #[tokio::test]
    async fn test_spawn_serves_health() {
        let handle = server(0).spawn().await.unwrap();
        assert_ne!(handle.local_addr().port(), 0);

        let body: Value = reqwest::get(format!("{}/health", handle.base_url()))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["toolkit_id"], "drain");

        let outcome = handle.drain(Duration::from_secs(1)).await;
        assert!(outcome.completed);
    }

    #[tokio::test]
    async fn test_bind_conflict() {
        let first = server(0).spawn().await.unwrap();
        let err = server(first.local_addr().port()).spawn().await.err().unwrap();
        assert!(matches!(err, ApiError::Bind { .. }));
        first.drain(Duration::from_millis(100)).await;
    }

    #[tokio::test]
    async fn test_drain_lets_in_flight_call_finish() {
        let handle = server(0).spawn().await.unwrap();
        let url = format!("{}/execute", handle.base_url());
        let in_flight = handle.state().in_flight().clone();

        let call = tokio::spawn(async move {
            reqwest::Client::new()
                .post(url)
                .json(&json!({ "tool_name": "wait", "arguments": { "ms": 300 } }))
                .send()
                .await
        });
        while in_flight.count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let outcome = handle.drain(Duration::from_secs(5)).await;
        assert_eq!(
            outcome,
            DrainOutcome {
                completed: true,
                abandoned: 0
            }
        );

        let response = call.await.unwrap().unwrap();
        assert!(response.status().is_success());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["result"]["slept"], 300);
    }

    #[tokio::test]
    async fn test_drain_reports_abandoned_work() {
        let handle = server(0).spawn().await.unwrap();
        let url = format!("{}/execute", handle.base_url());
        let in_flight = handle.state().in_flight().clone();

        let _call = tokio::spawn(async move {
            reqwest::Client::new()
                .post(url)
                .json(&json!({ "tool_name": "wait", "arguments": { "ms": 10_000 } }))
                .send()
                .await
        });
        while in_flight.count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let outcome = handle.drain(Duration::from_millis(100)).await;
        assert!(!outcome.completed);
        assert_eq!(outcome.abandoned, 1);
    }
}
