//! Error types for tensor normalization and encoding

use thiserror::Error;

use crate::dtype::ElementType;

/// Tensor pipeline errors
#[derive(Debug, Error)]
pub enum TensorError {
    /// No active source adapter recognized the input value
    #[error(
        "unsupported input: expected a host array or a tensor from a registered source, got {0}"
    )]
    UnsupportedInput(String),

    /// Permutation length disagrees with the tensor rank
    #[error("permute must match the tensor's rank: rank {rank}, permutation length {len}")]
    ShapeMismatch {
        /// Tensor rank
        rank: usize,
        /// Permutation length
        len: usize,
    },

    /// Permutation repeats an axis or names one out of range
    #[error("invalid permutation: axis {axis} repeated or out of range for rank {rank}")]
    InvalidPermutation {
        /// Offending axis
        axis: usize,
        /// Tensor rank
        rank: usize,
    },

    /// Element type has no wire mapping
    #[error("unsupported dtype {0}")]
    UnsupportedDtype(ElementType),

    /// Buffer length disagrees with the shape
    #[error("data length mismatch: shape implies {expected} elements, got {actual}")]
    DataLength {
        /// Element (or byte) count implied by the shape
        expected: usize,
        /// Element (or byte) count supplied
        actual: usize,
    },

    /// Shape product exceeds the addressable element or byte count
    #[error("shape {shape:?} overflows the addressable size")]
    ShapeOverflow {
        /// Offending shape
        shape: Vec<usize>,
    },

    /// Compression stage error
    #[error("compression error: {0}")]
    Compression(#[from] tviz_compress::Error),

    /// Malformed envelope payload
    #[error("decode error: {0}")]
    Decode(String),

    /// Envelope JSON error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for tensor operations
pub type TensorResult<T> = Result<T, TensorError>;
