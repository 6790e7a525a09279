//! Error types for loading and validating gateway configuration.

use std::path::PathBuf;

/// Errors that can occur while building a [`GatewayConfig`](crate::GatewayConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}")]
    Read {
        /// Path of the file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or has wrongly typed fields.
    #[error("Failed to parse config file {path}")]
    Parse {
        /// Path of the file
        path: PathBuf,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// One or more required keys are absent.
    #[error("Missing required configuration keys: {}", keys.join(", "))]
    Missing {
        /// Names of the missing keys, in the order they were checked
        keys: Vec<String>,
    },

    /// An environment variable is present but cannot be parsed.
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnv {
        /// Variable name
        var: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A field holds a value outside its allowed range.
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Helper to create an `InvalidValue` error.
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
