//! # ATP Supervisor
//!
//! Self-restarting host for a toolkit server.
//!
//! [`ToolkitHost::start`] launches the server and, when auto-restart is
//! enabled, a watch loop over the configured source paths. A settled burst
//! of changes drains the running server (new requests get a retryable 503,
//! in-flight executions get a grace period), then the process re-execs
//! itself or relaunches the server in place. Tools are registered by the
//! launch closure, so each generation serves the same catalog.

pub mod change;
pub mod error;
pub mod host;
pub mod launcher;
pub mod restart;
pub mod signal;
pub mod supervisor;

pub use change::{ChangeFilter, ChangeSource, NotifyChangeSource, PollingChangeSource};
pub use error::SupervisorError;
pub use host::ToolkitHost;
pub use launcher::{Launcher, ServerFactory};
pub use supervisor::{ProcessSupervisor, SupervisorEvent};
