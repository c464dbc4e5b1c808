//! Subscriber setup for tviz binaries
//!
//! Encoding emits `debug!` events with the dtype, shape, and byte counts of
//! every tensor; `trace!` covers source matching and renderer messages.

use crate::{Result, TelemetryError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Minimum severity of emitted events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Adapter matching, renderer messages
    Trace,
    /// Per-tensor encode summaries
    Debug,
    /// Files read and written
    Info,
    /// Recoverable oddities
    Warn,
    /// Failures only
    Error,
}

impl LogLevel {
    /// Every level, most verbose first
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Lowercase name, as accepted by `RUST_LOG`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Lower `base` by `verbose` steps (one per `-v`), saturating at trace
    pub fn from_verbosity(base: LogLevel, verbose: u8) -> Self {
        let start = Self::ALL.iter().position(|l| *l == base).unwrap_or(0);
        Self::ALL[start.saturating_sub(verbose as usize)]
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        let name = if name == "warning" { "warn" } else { name.as_str() };
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == name)
            .ok_or_else(|| TelemetryError::Logging(format!("unknown log level {:?}", s)))
    }
}

/// Event layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Multi-line, human oriented
    Pretty,
    /// One line per event
    Compact,
}

/// Where events are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
    /// Appended to a file; parent directories are created
    File(PathBuf),
}

/// Logging section of the tviz configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level when `RUST_LOG` is unset
    pub level: LogLevel,
    /// Event layout
    pub format: LogFormat,
    /// Destination
    pub output: LogOutput,
    /// Print the module path of each event
    pub show_target: bool,
    /// Print source file and line
    pub show_source_location: bool,
    /// Print thread ids
    pub show_thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            // stdout carries command output such as envelope JSON
            output: LogOutput::Stderr,
            show_target: true,
            show_source_location: false,
            show_thread_ids: false,
        }
    }
}

impl LogOutput {
    fn make_writer(&self) -> Result<BoxMakeWriter> {
        Ok(match self {
            LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
            LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
            LogOutput::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                BoxMakeWriter::new(Mutex::new(file))
            }
        })
    }
}

/// Install the global `tracing` subscriber described by `config`
///
/// `RUST_LOG`, when set, replaces `config.level`. Fails with
/// [`TelemetryError::Init`] if a global subscriber already exists.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(config.level).into())
        .from_env_lossy();
    let writer = config.output.make_writer()?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(matches!(config.output, LogOutput::Stderr | LogOutput::Stdout))
        .with_target(config.show_target)
        .with_file(config.show_source_location)
        .with_line_number(config.show_source_location)
        .with_thread_ids(config.show_thread_ids);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.map_err(|e| TelemetryError::Init(e.to_string()))
}
