//! Configuration for the tviz tools
//!
//! A [`VizConfig`] is read from TOML, then `TVIZ_*` environment variables
//! are layered on top, then the result is validated.

pub mod config;
pub mod validate;

pub use config::*;
pub use validate::*;

use std::path::PathBuf;

use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML
    #[error("invalid configuration TOML: {0}")]
    Parse(String),

    /// Field out of range
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Dotted field path
        field: String,
        /// What was wrong
        message: String,
    },

    /// Configured renderer bundle is missing
    #[error("renderer bundle not found: {}", .0.display())]
    BundleNotFound(PathBuf),

    /// Environment override could not be parsed
    #[error("{var}={value:?}: expected {expected}")]
    EnvVar {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// Accepted values
        expected: &'static str,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
