//! Toolkit host lifecycle facade.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use atp_api::ToolKitServer;
use atp_config::SupervisorConfig;

use crate::change;
use crate::error::SupervisorError;
use crate::launcher::{Launcher, ServerFactory};
use crate::signal::shutdown_signal;
use crate::supervisor::{launch_generation, ProcessSupervisor, SupervisorEvent};

struct Running {
    cancel: CancellationToken,
    task: JoinHandle<Result<(), SupervisorError>>,
}

/// Serves a toolkit and, when auto-restart is on, restarts it on source changes.
pub struct ToolkitHost {
    config: SupervisorConfig,
    launcher: Arc<dyn Launcher>,
    events: broadcast::Sender<SupervisorEvent>,
    addr: Arc<watch::Sender<Option<SocketAddr>>>,
    running: Option<Running>,
}

impl ToolkitHost {
    pub fn new(config: SupervisorConfig, launcher: Arc<dyn Launcher>) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            config,
            launcher,
            events,
            addr: Arc::new(watch::channel(None).0),
            running: None,
        }
    }

    /// Host whose server is rebuilt by `build` on every generation.
    pub fn from_factory<F>(config: SupervisorConfig, build: F) -> Self
    where
        F: Fn() -> ToolKitServer + Send + Sync + 'static,
    {
        Self::new(config, Arc::new(ServerFactory::new(build)))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Address of the generation currently serving. Follows in-process restarts.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().and(*self.addr.borrow())
    }

    /// Start serving and, if enabled, watching for changes.
    ///
    /// Bind failures surface here. Calling `start` on a running host returns
    /// the current address.
    pub async fn start(&mut self) -> Result<SocketAddr, SupervisorError> {
        if let Some(addr) = self.local_addr() {
            return Ok(addr);
        }

        let mut supervisor = ProcessSupervisor::new(self.launcher.clone(), &self.config)
            .with_events(self.events.clone())
            .with_address(self.addr.clone());
        if self.config.auto_restart {
            supervisor = supervisor.with_change_source(change::from_config(&self.config)?);
        } else {
            info!("Auto-restart disabled");
        }

        let handle = launch_generation(&self.launcher, &self.events, &self.addr, 0).await?;
        let addr = handle.local_addr();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(supervisor.supervise(handle, cancel.clone()));

        self.running = Some(Running { cancel, task });
        Ok(addr)
    }

    /// Drain the current generation and halt.
    pub async fn stop(&mut self) -> Result<(), SupervisorError> {
        let running = self.running.take().ok_or(SupervisorError::NotRunning)?;
        running.cancel.cancel();
        join(running.task).await
    }

    /// Start if needed, then run until SIGINT/SIGTERM or a fatal supervisor error.
    pub async fn run_until_signal(&mut self) -> Result<(), SupervisorError> {
        self.start().await?;

        let exited = {
            let running = self.running.as_mut().ok_or(SupervisorError::NotRunning)?;
            tokio::select! {
                signal = shutdown_signal() => {
                    signal?;
                    None
                }
                result = &mut running.task => Some(result),
            }
        };

        match exited {
            None => self.stop().await,
            Some(result) => {
                self.running = None;
                flatten(result)
            }
        }
    }
}

async fn join(task: JoinHandle<Result<(), SupervisorError>>) -> Result<(), SupervisorError> {
    flatten(task.await)
}

fn flatten(
    result: Result<Result<(), SupervisorError>, tokio::task::JoinError>,
) -> Result<(), SupervisorError> {
    match result {
        Ok(inner) => inner,
        Err(e) => Err(SupervisorError::Io(std::io::Error::other(e))),
    }
}
