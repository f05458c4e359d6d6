use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or resolving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing namespace override OR environment variable {var}")]
    MissingNamespace { var: &'static str },

    #[error("Missing access key id override OR environment variable {var}")]
    MissingAccessKeyId { var: &'static str },

    #[error("Missing secret access key override OR environment variable {var}")]
    MissingSecretAccessKey { var: &'static str },

    #[error("Integer value expected for port OR environment variable {var}. Got {value}")]
    InvalidPort { var: &'static str, value: String },

    #[error("Boolean value expected for secure flag OR environment variable {var}. Got {value}")]
    InvalidSecureFlag { var: &'static str, value: String },

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration was not loaded from a file and cannot be reloaded")]
    NotReloadable,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
