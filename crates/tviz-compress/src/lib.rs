//! tviz-compress: byte-level filters for tensor payloads
//!
//! Two stages run before a tensor buffer is base64-encoded for the renderer:
//! - Shuffle: a fixed-stride byte transpose grouping same-significance bytes
//! - Compression: zlib via flate2, tuned for encode latency
//!
//! The renderer undoes them in reverse order (inflate, then unshuffle).

#![warn(missing_docs)]

pub mod shuffle;
pub mod zlib;

pub use shuffle::{shuffle, unshuffle};
pub use zlib::ZlibCompressor;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compression error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Compression failed
    #[error("Compression error: {0}")]
    Compression(String),

    /// Decompression failed
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Invalid compression level
    #[error("Invalid compression level: {0}")]
    InvalidLevel(u32),

    /// Shuffle stride is zero or does not divide the buffer
    #[error("Invalid shuffle stride {stride} for buffer of {len} bytes")]
    InvalidStride {
        /// Requested stride in bytes
        stride: usize,
        /// Buffer length in bytes
        len: usize,
    },
}

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, Error>;

/// Compression algorithm trait
pub trait Compressor: Send + Sync {
    /// Compress data
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompress data
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompress at most `limit + 1` bytes
    ///
    /// Output longer than `limit` means the stream inflates past what the
    /// caller expects; the extra byte lets the caller detect that without
    /// buffering the rest.
    fn decompress_bounded(&self, input: &[u8], limit: usize) -> Result<Vec<u8>>;

    /// Algorithm name
    fn name(&self) -> &'static str;
}

/// Compression kinds understood by the renderer.
///
/// Serialized as the lowercase algorithm name, which is what appears in the
/// `compression` field of a tensor envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    /// zlib stream (RFC 1950)
    Zlib,
}

impl CompressionKind {
    /// Wire name of this compression kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zlib => "zlib",
        }
    }

    /// Build a compressor for this kind at the given level
    pub fn compressor(&self, level: u32) -> Result<Box<dyn Compressor>> {
        match self {
            Self::Zlib => Ok(Box::new(ZlibCompressor::new(level)?)),
        }
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size ratio of compressed output to original input (1.0 for empty input)
pub fn ratio(original: usize, compressed: usize) -> f64 {
    if original == 0 {
        return 1.0;
    }
    compressed as f64 / original as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&CompressionKind::Zlib).unwrap();
        assert_eq!(json, "\"zlib\"");

        let kind: CompressionKind = serde_json::from_str("\"zlib\"").unwrap();
        assert_eq!(kind, CompressionKind::Zlib);
    }

    #[test]
    fn test_kind_builds_compressor() {
        let compressor = CompressionKind::Zlib.compressor(1).unwrap();
        assert_eq!(compressor.name(), "zlib");
        assert!(CompressionKind::Zlib.compressor(12).is_err());
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(0, 0), 1.0);
        assert_eq!(ratio(100, 25), 0.25);
    }
}
