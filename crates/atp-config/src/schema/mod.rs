//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod schema_client;
mod schema_supervisor;

pub use schema_client::*;
pub use schema_supervisor::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub supervisor: SupervisorConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub oauth: OAuthConfig,
}

/// Tool host server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Toolkit id this host answers to.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Bearer key required on every request when set.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Externally reachable base URL advertised in execution routes.
    #[serde(default)]
    pub public_url: Option<String>,

    #[serde(default = "default_handler_timeout")]
    pub handler_timeout_secs: u64,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            app_name: default_app_name(),
            api_key: None,
            public_url: None,
            handler_timeout_secs: default_handler_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.handler_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_app_name() -> String {
    "toolkit".to_string()
}

fn default_handler_timeout() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
