//! OAuth connection flow.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use atp_protocols::error::{AtpError, AuthError};
use atp_protocols::oauth::{AuthorizationUrl, ConnectionStatus, OAuthSession, SessionStatus};

use crate::backend::OAuthBackend;

type SessionKey = (String, String);

fn key(platform_id: &str, external_user_id: &str) -> SessionKey {
    (platform_id.to_string(), external_user_id.to_string())
}

/// Initiates and polls delegated authorizations per platform/user pair.
pub struct OAuthConnector {
    backend: Arc<dyn OAuthBackend>,
    sessions: DashMap<SessionKey, OAuthSession>,
}

impl OAuthConnector {
    pub fn new(backend: Arc<dyn OAuthBackend>) -> Self {
        Self {
            backend,
            sessions: DashMap::new(),
        }
    }

    /// Start an authorization and return the URL the user must visit.
    pub async fn initiate(
        &self,
        platform_id: &str,
        external_user_id: &str,
    ) -> Result<AuthorizationUrl, AtpError> {
        let url = self.backend.initiate(platform_id, external_user_id).await?;
        info!(
            "OAuth connection initiated for {} on {}",
            external_user_id, platform_id
        );
        self.sessions.insert(
            key(platform_id, external_user_id),
            OAuthSession::pending(platform_id, external_user_id, Some(url.auth_url.clone())),
        );
        Ok(url)
    }

    /// Poll until the connection is authorized, fails, times out, or `cancel` fires.
    ///
    /// Returns the backend's connection info. Transient transport failures
    /// are logged and polling continues. Cancelling only stops this wait.
    pub async fn wait_for_connection(
        &self,
        platform_id: &str,
        external_user_id: &str,
        poll_interval: Duration,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Value, AtpError> {
        let deadline = Instant::now() + timeout;
        let mut polls: u32 = 0;

        loop {
            let now = Instant::now();
            if now >= deadline {
                warn!(
                    "OAuth connection for {} on {} timed out after {} polls",
                    external_user_id, platform_id, polls
                );
                return Err(AuthError::OAuthTimeout {
                    waited_secs: timeout.as_secs(),
                    polls,
                }
                .into());
            }

            let next = (now + poll_interval).min(deadline);
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("OAuth wait for {} on {} cancelled", external_user_id, platform_id);
                    return Err(AuthError::Cancelled.into());
                }
                _ = sleep_until(next) => {}
            }

            polls += 1;
            let report = match self.backend.status(platform_id, external_user_id).await {
                Ok(report) => report,
                Err(e) if e.is_retryable() => {
                    warn!("OAuth status poll failed, will retry: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let session = self.record(platform_id, external_user_id, report);

            match session.status {
                SessionStatus::Pending => continue,
                SessionStatus::Authorized => {
                    info!(
                        "OAuth connection established for {} on {} after {} polls",
                        external_user_id, platform_id, polls
                    );
                    return Ok(session.connection_info.unwrap_or(Value::Null));
                }
                status => return Err(AuthError::OAuthFailed(status).into()),
            }
        }
    }

    /// Fetch the backend status once and record it.
    ///
    /// Picks up a connection authorized outside this connector, e.g. by an
    /// earlier process, without initiating a new one.
    pub async fn refresh(
        &self,
        platform_id: &str,
        external_user_id: &str,
    ) -> Result<OAuthSession, AtpError> {
        let report = self.backend.status(platform_id, external_user_id).await?;
        let session = self.record(platform_id, external_user_id, report);
        debug!(
            "OAuth session for {} on {} is {}",
            external_user_id, platform_id, session.status
        );
        Ok(session)
    }

    fn record(&self, platform_id: &str, external_user_id: &str, report: ConnectionStatus) -> OAuthSession {
        let mut entry = self
            .sessions
            .entry(key(platform_id, external_user_id))
            .or_insert_with(|| OAuthSession::pending(platform_id, external_user_id, None));
        entry.apply(report);
        entry.clone()
    }

    pub fn session(&self, platform_id: &str, external_user_id: &str) -> Option<OAuthSession> {
        self.sessions
            .get(&key(platform_id, external_user_id))
            .map(|s| s.clone())
    }

    /// Credential of an authorized connection.
    pub fn credential(&self, platform_id: &str, external_user_id: &str) -> Result<String, AuthError> {
        self.session(platform_id, external_user_id)
            .and_then(|s| s.credential())
            .ok_or_else(|| AuthError::AuthNotEstablished {
                platform_id: platform_id.to_string(),
                external_user_id: external_user_id.to_string(),
            })
    }

    /// Forget a session, e.g. after the user revokes access.
    pub fn forget(&self, platform_id: &str, external_user_id: &str) -> Option<OAuthSession> {
        self.sessions
            .remove(&key(platform_id, external_user_id))
            .map(|(_, s)| s)
    }
}

#[cfg(test)]
#[path = "oauth_tests.rs"]
mod tests;
