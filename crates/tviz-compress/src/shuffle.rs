//! Fixed-stride byte shuffle
//!
//! A buffer of `n` elements, each `stride` bytes wide, is viewed as an
//! `(n, stride)` byte matrix and transposed to `(stride, n)`. Byte `b` of
//! element `i` lands at `b * n + i`, so all lowest-order bytes come first,
//! then all next bytes, and so on. Numeric data with correlated magnitudes
//! compresses noticeably better after this transform.

use crate::{Error, Result};

fn element_count(len: usize, stride: usize) -> Result<usize> {
    if stride == 0 || len % stride != 0 {
        return Err(Error::InvalidStride { stride, len });
    }
    Ok(len / stride)
}

/// Transpose `input` from `(len / stride, stride)` to `(stride, len / stride)`
pub fn shuffle(input: &[u8], stride: usize) -> Result<Vec<u8>> {
    let count = element_count(input.len(), stride)?;
    let mut out = vec![0u8; input.len()];
    for (i, element) in input.chunks_exact(stride).enumerate() {
        for (b, &byte) in element.iter().enumerate() {
            out[b * count + i] = byte;
        }
    }
    Ok(out)
}

/// Inverse of [`shuffle`]
pub fn unshuffle(input: &[u8], stride: usize) -> Result<Vec<u8>> {
    let count = element_count(input.len(), stride)?;
    let mut out = vec![0u8; input.len()];
    for (b, plane) in input.chunks_exact(count.max(1)).enumerate().take(stride) {
        for (i, &byte) in plane.iter().enumerate() {
            out[i * stride + b] = byte;
        }
    }
    Ok(out)
}
