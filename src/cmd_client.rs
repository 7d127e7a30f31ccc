//! Client subcommand handlers: `context`, `call` and `oauth`.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use atp_client::{CallOptions, HttpBackend, OAuthConnector, ToolExecutionDispatcher};
use atp_config::Config;
use atp_protocols::oauth::SessionStatus;

/// Print a toolkit's provider-shaped tool schemas.
pub(crate) async fn handle_context(
    config: &Config,
    toolkit_id: &str,
    provider: &str,
    prompt: Option<&str>,
) -> anyhow::Result<()> {
    let dispatcher = ToolExecutionDispatcher::from_config(&config.client)?;
    let context = dispatcher
        .get_toolkit_context(toolkit_id, provider, prompt)
        .await
        .with_context(|| format!("failed to fetch context for toolkit {toolkit_id}"))?;

    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

/// Arguments of `atp call`.
pub(crate) struct CallArgs<'a> {
    pub toolkit_id: &'a str,
    pub provider: &'a str,
    pub payload: &'a Path,
    pub auth_token: Option<String>,
    pub user: Option<String>,
    pub platforms: &'a [String],
}

/// Execute a payload of provider tool calls and print the provider-shaped results.
pub(crate) async fn handle_call(config: &Config, args: CallArgs<'_>) -> anyhow::Result<()> {
    let payload = read_payload(args.payload)?;

    let mut dispatcher = ToolExecutionDispatcher::from_config(&config.client)?;
    let mut options = CallOptions::default();
    if let Some(token) = args.auth_token {
        options = options.with_auth_token(token);
    }

    if let Some(user) = args.user {
        let connector = Arc::new(OAuthConnector::new(Arc::new(HttpBackend::new(&config.client)?)));
        for platform in args.platforms {
            match connector.refresh(platform, &user).await {
                Ok(session) if session.status == SessionStatus::Authorized => {
                    info!("Using {} connection for {}", platform, user);
                }
                Ok(session) => warn!("{} connection for {} is {}", platform, user, session.status),
                Err(e) => warn!("Could not load {} connection for {}: {}", platform, user, e),
            }
        }
        dispatcher = dispatcher.with_oauth(connector);
        options = options.with_external_user(user);
    } else if !args.platforms.is_empty() {
        bail!("--platform requires --user");
    }

    let results = dispatcher
        .call_tool(args.toolkit_id, &payload, args.provider, &options)
        .await
        .with_context(|| format!("failed to execute tool calls on toolkit {}", args.toolkit_id))?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// Start an OAuth connection and wait for the user to authorize it.
pub(crate) async fn handle_oauth(
    config: &Config,
    platform_id: &str,
    external_user_id: &str,
) -> anyhow::Result<()> {
    let connector = OAuthConnector::new(Arc::new(HttpBackend::new(&config.client)?));
    let url = connector
        .initiate(platform_id, external_user_id)
        .await
        .with_context(|| format!("failed to start {platform_id} connection"))?;

    println!("Visit this URL to authorize {platform_id}:\n\n  {}\n", url.auth_url);
    println!("Waiting for authorization (Ctrl+C to stop waiting)...");

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let info = connector
        .wait_for_connection(
            platform_id,
            external_user_id,
            config.oauth.poll_interval(),
            config.oauth.timeout(),
            &cancel,
        )
        .await?;

    println!("Connected.");
    if !info.is_null() {
        println!("{}", serde_json::to_string_pretty(&info)?);
    }
    Ok(())
}

fn read_payload(path: &Path) -> anyhow::Result<Value> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload {}", path.display()))?
    };
    serde_json::from_str(&raw).context("payload is not valid JSON")
}
