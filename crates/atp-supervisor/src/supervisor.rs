//! Watch loop and drain/restart protocol.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use atp_api::{DrainOutcome, ServerHandle};
use atp_config::{RestartMode, SupervisorConfig};

use crate::change::{next_settled, ChangeSource};
use crate::error::SupervisorError;
use crate::launcher::Launcher;
use crate::restart;

/// Lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// A server generation is listening.
    Started { generation: u64, addr: SocketAddr },
    /// A settled batch of source changes triggered a restart.
    ChangeDetected { paths: Vec<PathBuf> },
    /// A generation finished draining.
    Drained { generation: u64, outcome: DrainOutcome },
    /// The supervisor exited after a stop request.
    Stopped,
}

enum Wake {
    Stop,
    Changed(Vec<PathBuf>),
    SourceClosed,
}

/// Runs generations of the toolkit server and restarts on source changes.
pub struct ProcessSupervisor {
    launcher: Arc<dyn Launcher>,
    source: Option<Box<dyn ChangeSource>>,
    restart_mode: RestartMode,
    grace: Duration,
    debounce: Duration,
    events: broadcast::Sender<SupervisorEvent>,
    addr: Arc<watch::Sender<Option<SocketAddr>>>,
}

impl ProcessSupervisor {
    /// Supervisor without a change source: serves until stopped.
    pub fn new(launcher: Arc<dyn Launcher>, config: &SupervisorConfig) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            launcher,
            source: None,
            restart_mode: config.restart_mode,
            grace: config.grace_period(),
            debounce: config.debounce(),
            events,
            addr: Arc::new(watch::channel(None).0),
        }
    }

    pub fn with_change_source(mut self, source: Box<dyn ChangeSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_events(mut self, events: broadcast::Sender<SupervisorEvent>) -> Self {
        self.events = events;
        self
    }

    /// Publish the listening address of every generation through `addr`.
    pub fn with_address(mut self, addr: Arc<watch::Sender<Option<SocketAddr>>>) -> Self {
        self.addr = addr;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.events.subscribe()
    }

    /// Address of the generation currently serving.
    pub fn current_addr(&self) -> watch::Receiver<Option<SocketAddr>> {
        self.addr.subscribe()
    }

    /// Launch the first generation, then supervise until cancelled.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), SupervisorError> {
        let handle = launch_generation(&self.launcher, &self.events, &self.addr, 0).await?;
        self.supervise(handle, cancel).await
    }

    /// Supervise an already launched generation.
    ///
    /// On a settled change the current generation is drained, then either
    /// the process re-execs or a new generation is launched in place. A
    /// failed relaunch ends the loop with a fatal error.
    pub async fn supervise(
        mut self,
        mut handle: ServerHandle,
        cancel: CancellationToken,
    ) -> Result<(), SupervisorError> {
        let mut generation = 0;

        loop {
            let wake = match self.source.as_deref_mut() {
                Some(source) => tokio::select! {
                    _ = cancel.cancelled() => Wake::Stop,
                    changed = next_settled(source, self.debounce) => match changed {
                        Some(paths) => Wake::Changed(paths),
                        None => Wake::SourceClosed,
                    },
                },
                None => {
                    cancel.cancelled().await;
                    Wake::Stop
                }
            };

            match wake {
                Wake::Stop => {
                    let outcome = handle.drain(self.grace).await;
                    let _ = self.events.send(SupervisorEvent::Drained {
                        generation,
                        outcome,
                    });
                    let _ = self.events.send(SupervisorEvent::Stopped);
                    info!("Supervisor stopped");
                    return Ok(());
                }
                Wake::SourceClosed => {
                    warn!("Change source closed, auto-restart disabled for this run");
                    self.source = None;
                }
                Wake::Changed(paths) => {
                    info!(
                        "Source change detected ({} files), restarting generation {}",
                        paths.len(),
                        generation
                    );
                    let _ = self.events.send(SupervisorEvent::ChangeDetected { paths });

                    let outcome = handle.drain(self.grace).await;
                    let _ = self.events.send(SupervisorEvent::Drained {
                        generation,
                        outcome,
                    });

                    match self.restart_mode {
                        RestartMode::Exec => return Err(restart::reexec()),
                        RestartMode::InProcess => {
                            generation += 1;
                            handle = launch_generation(
                                &self.launcher,
                                &self.events,
                                &self.addr,
                                generation,
                            )
                            .await?;
                            info!(
                                "Generation {} listening on {}",
                                generation,
                                handle.local_addr()
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Launch one generation and announce it. The address is published before
/// the `Started` event.
pub(crate) async fn launch_generation(
    launcher: &Arc<dyn Launcher>,
    events: &broadcast::Sender<SupervisorEvent>,
    addr: &watch::Sender<Option<SocketAddr>>,
    generation: u64,
) -> Result<ServerHandle, SupervisorError> {
    let handle = launcher.launch().await?;
    addr.send_replace(Some(handle.local_addr()));
    let _ = events.send(SupervisorEvent::Started {
        generation,
        addr: handle.local_addr(),
    });
    Ok(handle)
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
