//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_supervisor(config, &mut result);
        Self::validate_client(config, &mut result);
        Self::validate_oauth(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }

        if config.server.app_name.trim().is_empty() {
            result.add_error(ValidationError::new(
                "server.app_name",
                "app_name cannot be empty",
            ));
        }

        if config.server.handler_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "server.handler_timeout_secs",
                "handler_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_supervisor(config: &Config, result: &mut ValidationResult) {
        let supervisor = &config.supervisor;
        if !supervisor.auto_restart {
            return;
        }

        if supervisor.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "supervisor.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        }

        if supervisor.watch_paths.is_empty() {
            result.add_warning(ValidationWarning::new(
                "supervisor.watch_paths",
                "auto_restart is enabled but no paths are watched",
            ));
        }

        for path in &supervisor.watch_paths {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "supervisor.watch_paths",
                    format!("Watch path does not exist: {:?}", path),
                ));
            }
        }

        if supervisor.grace_period_secs == 0 {
            result.add_warning(ValidationWarning::new(
                "supervisor.grace_period_secs",
                "grace period is 0, in-flight calls will be cut off on restart",
            ));
        }
    }

    fn validate_client(config: &Config, result: &mut ValidationResult) {
        let client = &config.client;
        if client.max_concurrency == 0 {
            result.add_error(ValidationError::new(
                "client.max_concurrency",
                "max_concurrency must be greater than 0",
            ));
        }

        if !matches!(client.protocol.as_str(), "http" | "https") {
            result.add_error(ValidationError::new(
                "client.protocol",
                "protocol must be http or https",
            ));
        }

        if client.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "client.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        } else if client.request_timeout_secs <= config.server.handler_timeout_secs {
            result.add_warning(ValidationWarning::new(
                "client.request_timeout_secs",
                "request timeout does not exceed server.handler_timeout_secs, slow tools will fail on the client",
            ));
        }

        if client.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "client.api_key",
                "API key is not set, may need to be set via environment variable",
            ));
        }
    }

    fn validate_oauth(config: &Config, result: &mut ValidationResult) {
        let oauth = &config.oauth;
        if oauth.poll_interval_secs == 0 {
            result.add_error(ValidationError::new(
                "oauth.poll_interval_secs",
                "poll_interval_secs must be greater than 0",
            ));
        } else if oauth.poll_interval_secs > oauth.timeout_secs {
            result.add_error(ValidationError::new(
                "oauth.poll_interval_secs",
                "poll_interval_secs cannot exceed timeout_secs",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
