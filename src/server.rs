//! `atp serve`: host the demo toolkit under the supervisor.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use atp_api::ToolKitServer;
use atp_client::default_providers;
use atp_config::{Config, ServerConfig};
use atp_core::ToolRegistry;
use atp_supervisor::ToolkitHost;

use crate::register::register_demo_tools;

/// Overrides from the command line.
pub(crate) struct ServeOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_auto_restart: bool,
}

/// Run the toolkit host until SIGINT/SIGTERM.
pub(crate) async fn run_server(mut config: Config, options: ServeOptions) -> anyhow::Result<()> {
    if let Some(host) = options.host {
        config.server.host = host;
    }
    if let Some(port) = options.port {
        config.server.port = port;
    }
    if options.no_auto_restart {
        config.supervisor.auto_restart = false;
    }

    let server_config = config.server.clone();
    let auto_restart = config.supervisor.auto_restart;
    let mut host = ToolkitHost::from_factory(config.supervisor.clone(), move || {
        build_server(&server_config, auto_restart)
    });

    let addr = host
        .start()
        .await
        .with_context(|| format!("failed to start toolkit host on {}", config.server.bind_addr()))?;
    info!(
        "Toolkit {} serving on http://{} (auto-restart: {})",
        config.server.app_name, addr, auto_restart
    );

    host.run_until_signal().await?;
    info!("Toolkit host stopped");
    Ok(())
}

/// Build one server generation with a fresh registry.
fn build_server(config: &ServerConfig, auto_restart: bool) -> ToolKitServer {
    let registry = Arc::new(ToolRegistry::new());
    if let Err(e) = register_demo_tools(&registry, auto_restart) {
        error!("Failed to register demo tools: {}", e);
    }
    ToolKitServer::new(config.clone(), registry, Arc::new(default_providers()))
}
