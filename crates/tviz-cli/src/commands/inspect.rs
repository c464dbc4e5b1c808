//! inspect command - payload size at each encoding stage

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tviz_compress::ratio;
use tviz_tensor::{EncoderConfig, Envelope, HostArray, TensorEncoder};

use super::read_raw;

/// Sizes of one tensor's payload under different encodings
#[derive(Debug, Clone, PartialEq)]
pub struct StageSizes {
    /// Little-endian element bytes after the wire cast
    pub raw: usize,
    /// zlib without the byte shuffle
    pub zlib: usize,
    /// byte shuffle then zlib; `None` when the dtype has no stride
    pub shuffled_zlib: Option<usize>,
}

/// Execute the inspect command
pub fn execute(input: &Path, dtype: &str, shape: &str, config: &EncoderConfig) -> Result<()> {
    let array = read_raw(input, dtype, shape)?
        .to_host()
        .with_context(|| format!("Failed to load {}", input.display()))?;
    let sizes = measure(&array, config)?;

    println!("{}", style("Encoding stages").bold().cyan());
    println!("{}", style("=".repeat(40)).dim());
    println!("Source dtype:    {}", array.dtype());
    println!("Shape:           {:?}", array.shape());
    println!("Raw:             {} bytes", sizes.raw);
    println!(
        "zlib:            {} bytes ({:.1}% of raw)",
        sizes.zlib,
        ratio(sizes.raw, sizes.zlib) * 100.0
    );
    match sizes.shuffled_zlib {
        Some(size) => println!(
            "shuffle + zlib:  {} bytes ({:.1}% of raw)",
            size,
            ratio(sizes.raw, size) * 100.0
        ),
        None => println!("shuffle + zlib:  {}", style("n/a (8-bit type)").dim()),
    }
    Ok(())
}

/// Encode `array` three ways and measure the payloads
pub fn measure(array: &HostArray, config: &EncoderConfig) -> Result<StageSizes> {
    let raw = encode_with(array, EncoderConfig::passthrough())?;

    let mut zlib_only = config.clone();
    zlib_only.compression.enabled = true;
    zlib_only.shuffle = false;
    let zlib = encode_with(array, zlib_only)?;

    let mut shuffled = config.clone();
    shuffled.compression.enabled = true;
    shuffled.shuffle = true;
    let shuffled = encode_with(array, shuffled)?;

    Ok(StageSizes {
        raw: raw.payload()?.len(),
        zlib: zlib.payload()?.len(),
        shuffled_zlib: match shuffled.shuffle {
            Some(_) => Some(shuffled.payload()?.len()),
            None => None,
        },
    })
}

fn encode_with(array: &HostArray, config: EncoderConfig) -> Result<Envelope> {
    Ok(TensorEncoder::new(config).encode(array)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_float32() {
        let values: Vec<f32> = (0..1024).map(|i| i as f32 * 0.25).collect();
        let array = HostArray::from_vec(vec![32, 32], values).unwrap();

        let sizes = measure(&array, &EncoderConfig::default()).unwrap();
        assert_eq!(sizes.raw, 4096);
        assert!(sizes.zlib < sizes.raw);
        assert!(sizes.shuffled_zlib.is_some());
    }

    #[test]
    fn test_measure_uint8_has_no_shuffle_stage() {
        let array = HostArray::from_vec(vec![4], vec![1u8, 1, 1, 1]).unwrap();
        let sizes = measure(&array, &EncoderConfig::passthrough()).unwrap();
        assert_eq!(sizes.raw, 4);
        assert_eq!(sizes.shuffled_zlib, None);
    }

    #[test]
    fn test_measure_unsupported_dtype() {
        let array = HostArray::from_vec(vec![2], vec![true, false]).unwrap();
        assert!(measure(&array, &EncoderConfig::default()).is_err());
    }
}
