//! Shutdown signals.

use tracing::info;

use crate::error::SupervisorError;

/// Resolve on the first SIGINT or SIGTERM.
#[cfg(unix)]
pub async fn shutdown_signal() -> Result<(), SupervisorError> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).map_err(|e| SupervisorError::Signal(e.to_string()))?;
    let mut sigint =
        signal(SignalKind::interrupt()).map_err(|e| SupervisorError::Signal(e.to_string()))?;

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM"),
        _ = sigint.recv() => info!("Received SIGINT"),
    }
    Ok(())
}

/// Resolve on Ctrl-C.
#[cfg(not(unix))]
pub async fn shutdown_signal() -> Result<(), SupervisorError> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| SupervisorError::Signal(e.to_string()))?;
    info!("Received Ctrl-C");
    Ok(())
}
