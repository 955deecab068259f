//! Error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building Cadence primitives from configuration
#[derive(Error, Debug)]
pub enum CadenceError {
    /// Easing name not recognised
    #[error("Unknown easing: {0}")]
    UnknownEasing(String),

    /// Malformed cubic-bezier easing
    #[error("Invalid cubic-bezier: {0}")]
    InvalidBezier(String),

    /// Configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be written
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Configuration file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration value out of range
    #[error("Invalid configuration value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Result type for Cadence operations
pub type Result<T> = std::result::Result<T, CadenceError>;
