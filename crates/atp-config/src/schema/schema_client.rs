//! LLM-facing client and OAuth configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Toolkit backend client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend address, with or without scheme.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Scheme used when `base_url` has none.
    #[serde(default = "default_protocol")]
    pub protocol: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound on concurrent tool calls within one batch.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Should exceed `server.handler_timeout_secs`.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            protocol: default_protocol(),
            api_key: None,
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout(),
            retry: RetrySettings::default(),
        }
    }
}

impl ClientConfig {
    /// Base URL with scheme, without a trailing slash.
    pub fn endpoint_base(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.contains("://") {
            base.to_string()
        } else {
            format!("{}://{}", self.protocol, base)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_base_url() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_max_concurrency() -> usize {
    8
}

fn default_request_timeout() -> u64 {
    60
}

/// Backoff for retryable transport failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay() -> u64 {
    250
}

fn default_max_delay() -> u64 {
    5000
}

/// OAuth polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    #[serde(default = "default_oauth_poll")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_oauth_timeout")]
    pub timeout_secs: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_oauth_poll(),
            timeout_secs: default_oauth_timeout(),
        }
    }
}

impl OAuthConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_oauth_poll() -> u64 {
    5
}

fn default_oauth_timeout() -> u64 {
    300
}
