//! encode command - raw tensor file to envelope JSON

use std::path::Path;

use anyhow::{Context, Result};
use tviz_tensor::{EncoderConfig, Envelope, SourceRegistry, TensorEncoder};

use super::{parse_dims, read_raw};

/// Execute the encode command
pub fn execute(
    input: &Path,
    dtype: &str,
    shape: &str,
    permute: Option<&str>,
    output: Option<&Path>,
    config: &EncoderConfig,
) -> Result<()> {
    let envelope = encode_file(input, dtype, shape, permute, config)?;
    let json = envelope.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = json.len(), "envelope written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Read, normalize, permute, and encode a raw tensor file
pub fn encode_file(
    input: &Path,
    dtype: &str,
    shape: &str,
    permute: Option<&str>,
    config: &EncoderConfig,
) -> Result<Envelope> {
    let raw = read_raw(input, dtype, shape)?;
    let permute = permute.map(parse_dims).transpose()?;
    let envelope = TensorEncoder::new(config.clone())
        .encode_source(SourceRegistry::global(), &raw, permute.as_deref())
        .with_context(|| format!("Failed to encode {}", input.display()))?;
    Ok(envelope)
}
