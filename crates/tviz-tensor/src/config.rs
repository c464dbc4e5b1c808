//! Configuration for tensor encoding

use serde::{Deserialize, Serialize};
use tviz_compress::zlib::BEST_SPEED;

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Compression configuration
    pub compression: CompressionConfig,
    /// Apply the byte shuffle for types that define a stride
    pub shuffle: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            compression: CompressionConfig::default(),
            shuffle: true,
        }
    }
}

impl EncoderConfig {
    /// Configuration emitting uncompressed, unshuffled payloads
    pub fn passthrough() -> Self {
        Self {
            compression: CompressionConfig {
                enabled: false,
                ..CompressionConfig::default()
            },
            shuffle: false,
        }
    }

    /// Set the compression level
    pub fn with_level(mut self, level: u32) -> Self {
        self.compression.level = level;
        self
    }
}

/// Compression configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Compress when the dtype table asks for it
    pub enabled: bool,
    /// zlib level (0-9)
    pub level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: BEST_SPEED,
        }
    }
}
