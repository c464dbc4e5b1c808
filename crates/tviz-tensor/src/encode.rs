//! Tensor to envelope encoding

use std::any::Any;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tviz_compress::{ratio, shuffle};

use crate::array::{ArrayData, HostArray};
use crate::config::EncoderConfig;
use crate::dtype::{to_le_bytes, WireDtype};
use crate::envelope::Envelope;
use crate::error::{TensorError, TensorResult};
use crate::source::SourceRegistry;

/// Encodes host arrays into wire envelopes
///
/// Stateless apart from its configuration; one encoder can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct TensorEncoder {
    config: EncoderConfig,
}

impl TensorEncoder {
    /// Create an encoder with the given configuration
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode `array` into an envelope
    ///
    /// Steps: dtype lookup, cast to the wire type, little-endian flatten,
    /// optional byte shuffle, optional zlib, base64. Any failure aborts the
    /// whole encode.
    pub fn encode(&self, array: &HostArray) -> TensorResult<Envelope> {
        let source = array.dtype();
        let mapping = source
            .mapping()
            .ok_or(TensorError::UnsupportedDtype(source))?;

        let mut bytes = cast_to_wire(array.data(), mapping.target)?;
        let raw_len = bytes.len();

        let stride = mapping.shuffle.filter(|_| self.config.shuffle);
        if let Some(stride) = stride {
            bytes = shuffle(&bytes, stride)?;
        }

        let compression = mapping
            .compression
            .filter(|_| self.config.compression.enabled);
        if let Some(kind) = compression {
            bytes = kind
                .compressor(self.config.compression.level)?
                .compress(&bytes)?;
        }

        tracing::debug!(
            source = %source,
            dtype = %mapping.target,
            shape = ?array.shape(),
            raw_bytes = raw_len,
            encoded_bytes = bytes.len(),
            ratio = ratio(raw_len, bytes.len()),
            "tensor encoded"
        );

        Ok(Envelope {
            shape: array.shape().to_vec(),
            compression,
            shuffle: stride,
            dtype: mapping.target,
            data: STANDARD.encode(&bytes),
        })
    }

    /// Normalize `input` with `registry`, apply `permute`, then encode
    pub fn encode_source<T: Any>(
        &self,
        registry: &SourceRegistry,
        input: &T,
        permute: Option<&[usize]>,
    ) -> TensorResult<Envelope> {
        let array = registry.normalize(input, permute)?;
        self.encode(&array)
    }
}

/// Encode with the default configuration
pub fn encode(array: &HostArray) -> TensorResult<Envelope> {
    TensorEncoder::default().encode(array)
}

/// Normalize with the default registry and encode with the default configuration
pub fn tensor_to_envelope<T: Any>(input: &T, permute: Option<&[usize]>) -> TensorResult<Envelope> {
    TensorEncoder::default().encode_source(SourceRegistry::global(), input, permute)
}

/// Cast elements to `target` and serialize them little-endian
///
/// Only widening float16 to float32 changes the element type; every other
/// table entry maps a type onto itself.
fn cast_to_wire(data: &ArrayData, target: WireDtype) -> TensorResult<Vec<u8>> {
    let bytes = match (data, target) {
        (ArrayData::Float16(v), WireDtype::Float32) => to_le_bytes(v.iter().map(|x| x.to_f32())),
        (ArrayData::Float32(v), WireDtype::Float32) => to_le_bytes(v.iter().copied()),
        (ArrayData::Float64(v), WireDtype::Float64) => to_le_bytes(v.iter().copied()),
        (ArrayData::Int8(v), WireDtype::Int8) => to_le_bytes(v.iter().copied()),
        (ArrayData::Uint8(v), WireDtype::Uint8) => v.clone(),
        (ArrayData::Int16(v), WireDtype::Int16) => to_le_bytes(v.iter().copied()),
        (ArrayData::Int32(v), WireDtype::Int32) => to_le_bytes(v.iter().copied()),
        (ArrayData::Int64(v), WireDtype::Int64) => to_le_bytes(v.iter().copied()),
        (other, _) => return Err(TensorError::UnsupportedDtype(other.element_type())),
    };
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::ElementType;
    use half::f16;
    use num_complex::Complex32;
    use tviz_compress::{unshuffle, CompressionKind, Compressor, ZlibCompressor};

    fn sample_f32() -> HostArray {
        HostArray::from_vec(vec![2, 3], vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn test_float32_envelope() {
        let envelope = encode(&sample_f32()).unwrap();
        assert_eq!(envelope.shape, vec![2, 3]);
        assert_eq!(envelope.dtype, WireDtype::Float32);
        assert_eq!(envelope.compression, Some(CompressionKind::Zlib));
        assert_eq!(envelope.shuffle, Some(4));
    }

    #[test]
    fn test_float32_manual_decode() {
        let envelope = encode(&sample_f32()).unwrap();

        let compressed = STANDARD.decode(&envelope.data).unwrap();
        let shuffled = ZlibCompressor::fastest().decompress(&compressed).unwrap();
        let bytes = unshuffle(&shuffled, 4).unwrap();
        let values: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_uint8_not_shuffled() {
        let array = HostArray::from_vec(vec![4], vec![0u8, 1, 2, 255]).unwrap();
        let envelope = encode(&array).unwrap();
        assert_eq!(envelope.shuffle, None);
        assert_eq!(envelope.compression, Some(CompressionKind::Zlib));

        let compressed = STANDARD.decode(&envelope.data).unwrap();
        let bytes = ZlibCompressor::fastest().decompress(&compressed).unwrap();
        assert_eq!(bytes, vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_float16_widened() {
        let values: Vec<f16> = [0.1f32, -1.5, 65504.0]
            .iter()
            .map(|&v| f16::from_f32(v))
            .collect();
        let array = HostArray::from_vec(vec![3], values.clone()).unwrap();
        let envelope = encode(&array).unwrap();
        assert_eq!(envelope.dtype, WireDtype::Float32);
        assert_eq!(envelope.shuffle, Some(4));

        let decoded = envelope.decode().unwrap();
        let expected: Vec<f32> = values.iter().map(|v| v.to_f32()).collect();
        assert_eq!(decoded.as_slice::<f32>().unwrap(), expected.as_slice());
    }

    #[test]
    fn test_complex_unsupported() {
        let array = HostArray::from_vec(vec![1], vec![Complex32::new(0.0, 1.0)]).unwrap();
        assert!(matches!(
            encode(&array),
            Err(TensorError::UnsupportedDtype(ElementType::Complex64))
        ));
    }

    #[test]
    fn test_bool_unsupported() {
        let array = HostArray::from_vec(vec![2], vec![true, false]).unwrap();
        assert!(matches!(
            encode(&array),
            Err(TensorError::UnsupportedDtype(ElementType::Bool))
        ));
    }

    #[test]
    fn test_passthrough_config() {
        let encoder = TensorEncoder::new(EncoderConfig::passthrough());
        let array = HostArray::from_vec(vec![2], vec![1i32, 256]).unwrap();
        let envelope = encoder.encode(&array).unwrap();
        assert_eq!(envelope.compression, None);
        assert_eq!(envelope.shuffle, None);
        assert_eq!(
            STANDARD.decode(&envelope.data).unwrap(),
            vec![1, 0, 0, 0, 0, 1, 0, 0]
        );
    }

    #[test]
    fn test_invalid_level_fails_encode() {
        let encoder = TensorEncoder::new(EncoderConfig::default().with_level(11));
        assert!(matches!(
            encoder.encode(&sample_f32()),
            Err(TensorError::Compression(_))
        ));
    }

    #[test]
    fn test_tensor_to_envelope_permutes() {
        let envelope = tensor_to_envelope(&sample_f32(), Some(&[1, 0])).unwrap();
        assert_eq!(envelope.shape, vec![3, 2]);
        let decoded = envelope.decode().unwrap();
        assert_eq!(
            decoded.as_slice::<f32>().unwrap(),
            &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]
        );
    }

    #[test]
    fn test_empty_tensor() {
        let array = HostArray::from_vec(vec![0, 4], Vec::<i64>::new()).unwrap();
        let envelope = encode(&array).unwrap();
        assert_eq!(envelope.shape, vec![0, 4]);
        assert!(envelope.decode().unwrap().is_empty());
    }
}
