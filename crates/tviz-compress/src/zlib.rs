//! zlib compression

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::{Compressor, Error, Result};

/// Fastest zlib level, matching `Z_BEST_SPEED`
pub const BEST_SPEED: u32 = 1;

/// zlib compressor
pub struct ZlibCompressor {
    level: u32,
}

impl ZlibCompressor {
    /// Create a new zlib compressor
    ///
    /// Level range: 0-9 (0 stores, 9 is smallest output)
    pub fn new(level: u32) -> Result<Self> {
        if level > 9 {
            return Err(Error::InvalidLevel(level));
        }
        Ok(Self { level })
    }

    /// Compressor tuned for encode latency over ratio
    pub fn fastest() -> Self {
        Self { level: BEST_SPEED }
    }

    /// Configured compression level
    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for ZlibCompressor {
    fn default() -> Self {
        Self::fastest()
    }
}

impl Compressor for ZlibCompressor {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity(input.len() / 2 + 64),
            Compression::new(self.level),
        );
        encoder
            .write_all(input)
            .map_err(|e| Error::Compression(e.to_string()))?;
        let out = encoder
            .finish()
            .map_err(|e| Error::Compression(e.to_string()))?;
        tracing::trace!(
            level = self.level,
            input = input.len(),
            output = out.len(),
            "zlib deflate"
        );
        Ok(out)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(input);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| Error::Decompression(e.to_string()))?;
        Ok(out)
    }

    fn decompress_bounded(&self, input: &[u8], limit: usize) -> Result<Vec<u8>> {
        let cap = (limit as u64).saturating_add(1);
        let mut out = Vec::with_capacity(limit.min(input.len().saturating_mul(4)));
        ZlibDecoder::new(input)
            .take(cap)
            .read_to_end(&mut out)
            .map_err(|e| Error::Decompression(e.to_string()))?;
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "zlib"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let compressor = ZlibCompressor::fastest();
        let data = b"hello world hello world hello world";

        let compressed = compressor.compress(data).unwrap();
        let decompressed = compressor.decompress(&compressed).unwrap();

        assert_eq!(data.as_slice(), decompressed.as_slice());
        assert!(compressed.len() < data.len());
    }

    #[test]
    fn test_zlib_header() {
        let compressed = ZlibCompressor::fastest().compress(&[0u8; 64]).unwrap();
        // CMF byte for deflate with a 32K window
        assert_eq!(compressed[0], 0x78);
        let header = u16::from(compressed[0]) << 8 | u16::from(compressed[1]);
        assert_eq!(header % 31, 0);
    }

    #[test]
    fn test_empty_input() {
        let compressor = ZlibCompressor::default();
        let compressed = compressor.compress(&[]).unwrap();
        assert!(!compressed.is_empty());
        assert!(compressor.decompress(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_level() {
        assert!(matches!(ZlibCompressor::new(10), Err(Error::InvalidLevel(10))));
        assert_eq!(ZlibCompressor::new(9).unwrap().level(), 9);
    }

    #[test]
    fn test_bounded_stops_past_limit() {
        let compressor = ZlibCompressor::fastest();
        let compressed = compressor.compress(&vec![0u8; 1 << 20]).unwrap();
        assert!(compressed.len() < 4096);

        let out = compressor.decompress_bounded(&compressed, 16).unwrap();
        assert_eq!(out.len(), 17);

        let exact = compressor.decompress_bounded(&compressed, 1 << 20).unwrap();
        assert_eq!(exact.len(), 1 << 20);
    }

    #[test]
    fn test_corrupt_input() {
        let result = ZlibCompressor::fastest().decompress(b"not a zlib stream");
        assert!(matches!(result, Err(Error::Decompression(_))));
    }
}
