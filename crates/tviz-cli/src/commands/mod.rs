//! CLI command implementations

pub mod bundle;
pub mod decode;
pub mod encode;
pub mod inspect;

use std::path::Path;

use anyhow::{Context, Result};
use tviz_tensor::{ElementType, RawTensor};

/// Parse a comma-separated list of non-negative integers
///
/// An empty string yields an empty list (a scalar shape).
pub fn parse_dims(text: &str) -> Result<Vec<usize>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid dimension {:?} in {:?}", part.trim(), text))
        })
        .collect()
}

/// Read a raw little-endian tensor file
pub fn read_raw(input: &Path, dtype: &str, shape: &str) -> Result<RawTensor> {
    let dtype: ElementType = dtype.parse()?;
    let shape = parse_dims(shape)?;
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    tracing::debug!(
        path = %input.display(),
        %dtype,
        ?shape,
        bytes = bytes.len(),
        "read raw tensor"
    );
    Ok(RawTensor::new(dtype, shape, bytes))
}
