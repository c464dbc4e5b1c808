//! Widget error types

use std::path::PathBuf;

use thiserror::Error;
use tviz_tensor::TensorError;

/// Widget shell errors
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Normalization or encoding failed
    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// Malformed renderer message
    #[error("invalid message: {0}")]
    Message(#[from] serde_json::Error),

    /// Unknown default view name
    #[error("unknown default view {0:?}")]
    UnknownView(String),

    /// Renderer bundle could not be read
    #[error("failed to read renderer bundle {path}: {source}")]
    Bundle {
        /// Bundle location
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// No renderer bundle installed for this process
    #[error("renderer bundle not installed")]
    BundleMissing,
}

/// Result type for widget operations
pub type WidgetResult<T> = Result<T, WidgetError>;
