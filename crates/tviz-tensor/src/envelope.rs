//! Wire envelope consumed by the renderer

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tviz_compress::{unshuffle, CompressionKind};

use crate::array::{checked_byte_len, checked_element_count, ArrayData, HostArray};
use crate::dtype::WireDtype;
use crate::error::{TensorError, TensorResult};

/// Self-describing encoded tensor
///
/// Serializes to
/// `{"shape":[..],"compression":"zlib"|null,"shuffle":n|null,"dtype":"..","data":".."}`.
/// `data` is the base64 text of the possibly shuffled, possibly compressed
/// little-endian element buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Tensor dimensions, outermost first
    pub shape: Vec<usize>,
    /// Compression applied to the payload
    pub compression: Option<CompressionKind>,
    /// Byte shuffle stride applied before compression
    pub shuffle: Option<usize>,
    /// Wire element type
    pub dtype: WireDtype,
    /// Base64 payload
    pub data: String,
}

impl Envelope {
    /// Serialize to JSON text
    pub fn to_json(&self) -> TensorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON text
    pub fn from_json(json: &str) -> TensorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of elements implied by the shape
    pub fn element_count(&self) -> TensorResult<usize> {
        checked_element_count(&self.shape)
    }

    /// Payload bytes after base64 decoding, before any other stage
    pub fn payload(&self) -> TensorResult<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| TensorError::Decode(format!("invalid base64 payload: {}", e)))
    }

    /// Invert the pipeline: base64, inflate, unshuffle, reinterpret
    ///
    /// The result carries the wire element type, so a float16 source comes
    /// back as float32.
    pub fn decode(&self) -> TensorResult<HostArray> {
        let width = self.dtype.width();
        if let Some(stride) = self.shuffle.filter(|&s| s != width) {
            return Err(TensorError::Decode(format!(
                "shuffle stride {} does not match {} width {}",
                stride, self.dtype, width
            )));
        }
        let expected = checked_byte_len(&self.shape, width)?;

        let mut bytes = self.payload()?;
        if let Some(kind) = self.compression {
            bytes = kind.compressor(0)?.decompress_bounded(&bytes, expected)?;
        }
        if bytes.len() != expected {
            return Err(TensorError::DataLength {
                expected,
                actual: bytes.len(),
            });
        }

        if let Some(stride) = self.shuffle {
            bytes = unshuffle(&bytes, stride)
                .map_err(|e| TensorError::Decode(format!("unshuffle failed: {}", e)))?;
        }

        let data = ArrayData::parse_le(self.dtype.element_type(), &bytes)?;
        HostArray::new(self.shape.clone(), data)
    }
}
