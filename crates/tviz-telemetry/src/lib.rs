//! tviz-telemetry: logging setup
//!
//! Library crates only emit `tracing` events. Binaries call
//! [`init_logging`] once at startup to install a subscriber.

#![warn(missing_docs)]

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel, LogOutput};

/// Telemetry error types
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Invalid logging configuration value
    #[error("Logging error: {0}")]
    Logging(String),

    /// Subscriber installation failed
    #[error("Initialization error: {0}")]
    Init(String),

    /// Log file could not be opened
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for telemetry operations
pub type Result<T> = std::result::Result<T, TelemetryError>;
