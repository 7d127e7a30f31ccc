//! ATP - Agent Tool Protocol
//!
//! Main entry point for the toolkit host and the client commands.

mod cli;
mod cmd_client;
mod paths;
mod register;
mod server;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use atp_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};
use crate::cmd_client::CallArgs;
use crate::server::ServeOptions;

fn init_tracing() -> anyhow::Result<()> {
    let log_dir = paths::log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("atp")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = ConfigLoader::load_or_default(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    let report = ConfigValidator::validate(&config)?;
    for warning in &report.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !report.is_valid() {
        let errors: Vec<String> = report
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        anyhow::bail!("invalid configuration: {}", errors.join("; "));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        None => {
            info!("No command given, serving the demo toolkit");
            server::run_server(
                config,
                ServeOptions {
                    host: None,
                    port: None,
                    no_auto_restart: false,
                },
            )
            .await
        }
        Some(Commands::Serve {
            host,
            port,
            no_auto_restart,
        }) => {
            server::run_server(
                config,
                ServeOptions {
                    host,
                    port,
                    no_auto_restart,
                },
            )
            .await
        }
        Some(Commands::Context {
            toolkit_id,
            provider,
            prompt,
        }) => cmd_client::handle_context(&config, &toolkit_id, &provider, prompt.as_deref()).await,
        Some(Commands::Call {
            toolkit_id,
            provider,
            payload,
            auth_token,
            user,
            platforms,
        }) => {
            cmd_client::handle_call(
                &config,
                CallArgs {
                    toolkit_id: &toolkit_id,
                    provider: &provider,
                    payload: &payload,
                    auth_token,
                    user,
                    platforms: &platforms,
                },
            )
            .await
        }
        Some(Commands::Oauth {
            platform_id,
            external_user_id,
        }) => cmd_client::handle_oauth(&config, &platform_id, &external_user_id).await,
    }
}
