//! Server launchers.

use async_trait::async_trait;

use atp_api::{ServerHandle, ToolKitServer};

use crate::error::SupervisorError;

/// Starts one generation of the toolkit server.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self) -> Result<ServerHandle, SupervisorError>;
}

/// Launcher that rebuilds the server, tool registrations included, on every launch.
///
/// Registration lives in the closure, so every generation registers the same
/// tools in the same order.
pub struct ServerFactory<F> {
    build: F,
}

impl<F> ServerFactory<F>
where
    F: Fn() -> ToolKitServer + Send + Sync,
{
    pub fn new(build: F) -> Self {
        Self { build }
    }
}

#[async_trait]
impl<F> Launcher for ServerFactory<F>
where
    F: Fn() -> ToolKitServer + Send + Sync,
{
    async fn launch(&self) -> Result<ServerHandle, SupervisorError> {
        let server = (self.build)();
        Ok(server.spawn().await?)
    }
}
