//! Application state.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Notify;

use atp_config::ServerConfig;
use atp_core::{ProviderRegistry, ToolRegistry};

use crate::executor::ToolExecutor;

/// Counter of executions currently running, with an idle notification.
#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track one execution until the guard drops.
    pub fn enter(self: &Arc<Self>) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            inner: Arc::clone(self),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Wait until nothing is in flight or `grace` elapses. Returns true if idle.
    pub async fn wait_idle(&self, grace: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + grace;
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.count() == 0 {
                return true;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.count() == 0;
            }
        }
    }
}

/// Decrements the in-flight counter on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    inner: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.inner.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub providers: Arc<ProviderRegistry>,
    pub executor: ToolExecutor,
    /// Toolkit id this server answers to.
    pub app_name: String,
    api_key: Option<String>,
    /// Externally reachable base URL, used when advertising execution routes.
    public_url: Option<String>,
    in_flight: Arc<InFlight>,
    draining: AtomicBool,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(
        config: &ServerConfig,
        registry: Arc<ToolRegistry>,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            executor: ToolExecutor::new(Arc::clone(&registry), config.handler_timeout()),
            registry,
            providers,
            app_name: config.app_name.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            public_url: config
                .public_url
                .as_deref()
                .map(|u| u.trim_end_matches('/').to_string()),
            in_flight: Arc::new(InFlight::new()),
            draining: AtomicBool::new(false),
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Set the externally reachable base URL.
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn public_url(&self) -> Option<&str> {
        self.public_url.as_deref()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn in_flight(&self) -> &Arc<InFlight> {
        &self.in_flight
    }

    /// Stop taking new executions.
    pub fn begin_drain(&self) {
        self.draining.store(true, Ordering::SeqCst);
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}
