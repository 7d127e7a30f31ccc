//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ConfigError::NotFound("atp.toml".to_string());
        assert!(err.to_string().contains("atp.toml"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_env_var_error() {
        let err = ConfigError::EnvVarNotSet("ATP_API_KEY".to_string());
        assert!(err.to_string().contains("ATP_API_KEY"));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::from(io);
        assert!(err.to_string().contains("IO error"));
    }
}
