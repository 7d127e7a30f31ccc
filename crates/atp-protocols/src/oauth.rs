//! OAuth session types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of a delegated authorization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Pending,
    Authorized,
    Expired,
    Failed,
}

impl SessionStatus {
    /// Authorized, expired and failed sessions never change again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Authorized => "authorized",
            Self::Expired => "expired",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// URL a human visits to authorize a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationUrl {
    pub auth_url: String,
}

/// Status report from the authorization backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_info: Option<Value>,
}

/// Authorization state for one platform/user pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthSession {
    pub platform_id: String,
    pub external_user_id: String,
    pub status: SessionStatus,
    /// Set once at initiation.
    pub auth_url: Option<String>,
    /// Set when the session becomes authorized.
    pub established_at: Option<DateTime<Utc>>,
    pub connection_info: Option<Value>,
}

impl OAuthSession {
    pub fn pending(
        platform_id: impl Into<String>,
        external_user_id: impl Into<String>,
        auth_url: Option<String>,
    ) -> Self {
        Self {
            platform_id: platform_id.into(),
            external_user_id: external_user_id.into(),
            status: SessionStatus::Pending,
            auth_url,
            established_at: None,
            connection_info: None,
        }
    }

    /// Apply a backend status report. Terminal sessions ignore further reports.
    pub fn apply(&mut self, report: ConnectionStatus) {
        if self.status.is_terminal() {
            return;
        }
        self.status = report.status;
        if report.status == SessionStatus::Authorized {
            self.established_at = Some(Utc::now());
            self.connection_info = report.connection_info;
        }
    }

    /// Credential carried by an authorized connection.
    ///
    /// Looks for `access_token`, then `token`, then `connection_id`.
    pub fn credential(&self) -> Option<String> {
        if self.status != SessionStatus::Authorized {
            return None;
        }
        let info = self.connection_info.as_ref()?;
        ["access_token", "token", "connection_id"]
            .iter()
            .find_map(|key| info.get(key).and_then(Value::as_str))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(status: SessionStatus, info: Option<Value>) -> ConnectionStatus {
        ConnectionStatus {
            status,
            connection_info: info,
        }
    }

    #[test]
    fn test_pending_to_authorized() {
        let mut session = OAuthSession::pending("github", "u-1", Some("https://auth".into()));
        session.apply(report(SessionStatus::Pending, None));
        assert_eq!(session.status, SessionStatus::Pending);
        assert!(session.credential().is_none());

        session.apply(report(
            SessionStatus::Authorized,
            Some(json!({ "access_token": "tok-123" })),
        ));
        assert_eq!(session.status, SessionStatus::Authorized);
        assert!(session.established_at.is_some());
        assert_eq!(session.credential().as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_terminal_status_is_sticky() {
        let mut session = OAuthSession::pending("github", "u-1", None);
        session.apply(report(SessionStatus::Expired, None));
        session.apply(report(SessionStatus::Authorized, Some(json!({ "token": "t" }))));
        assert_eq!(session.status, SessionStatus::Expired);
        assert!(session.credential().is_none());
    }

    #[test]
    fn test_status_wire_format() {
        let status: ConnectionStatus =
            serde_json::from_value(json!({ "status": "failed" })).unwrap();
        assert_eq!(status.status, SessionStatus::Failed);
        assert!(status.status.is_terminal());
        assert_eq!(SessionStatus::Pending.to_string(), "pending");
    }
}
