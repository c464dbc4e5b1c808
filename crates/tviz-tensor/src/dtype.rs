//! Element types and the fixed wire mapping table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tviz_compress::CompressionKind;

use crate::error::TensorError;

/// Element types a [`HostArray`](crate::HostArray) can hold
///
/// Only the types listed in the dtype table can be encoded; the rest exist so
/// that unsupported inputs are reported as such instead of being rejected at
/// conversion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Boolean
    Bool,
    /// Unsigned 8-bit integer
    Uint8,
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 16-bit integer
    Uint16,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 32-bit integer
    Uint32,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 64-bit integer
    Uint64,
    /// Signed 64-bit integer
    Int64,
    /// IEEE 754 half precision
    Float16,
    /// bfloat16
    Bfloat16,
    /// IEEE 754 single precision
    Float32,
    /// IEEE 754 double precision
    Float64,
    /// Complex with f32 parts
    Complex64,
    /// Complex with f64 parts
    Complex128,
}

impl ElementType {
    /// All element types, in declaration order
    pub const ALL: [ElementType; 15] = [
        Self::Bool,
        Self::Uint8,
        Self::Int8,
        Self::Uint16,
        Self::Int16,
        Self::Uint32,
        Self::Int32,
        Self::Uint64,
        Self::Int64,
        Self::Float16,
        Self::Bfloat16,
        Self::Float32,
        Self::Float64,
        Self::Complex64,
        Self::Complex128,
    ];

    /// Canonical name (numpy spelling)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Uint8 => "uint8",
            Self::Int8 => "int8",
            Self::Uint16 => "uint16",
            Self::Int16 => "int16",
            Self::Uint32 => "uint32",
            Self::Int32 => "int32",
            Self::Uint64 => "uint64",
            Self::Int64 => "int64",
            Self::Float16 => "float16",
            Self::Bfloat16 => "bfloat16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        }
    }

    /// Size of one element in bytes
    pub fn width(&self) -> usize {
        match self {
            Self::Bool | Self::Uint8 | Self::Int8 => 1,
            Self::Uint16 | Self::Int16 | Self::Float16 | Self::Bfloat16 => 2,
            Self::Uint32 | Self::Int32 | Self::Float32 => 4,
            Self::Uint64 | Self::Int64 | Self::Float64 | Self::Complex64 => 8,
            Self::Complex128 => 16,
        }
    }

    /// Wire mapping for this type, if it can be encoded
    pub fn mapping(&self) -> Option<&'static DtypeMapping> {
        DTYPE_TABLE
            .iter()
            .find(|(source, _)| source == self)
            .map(|(_, mapping)| mapping)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = TensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let alias = match lower.as_str() {
            "f16" | "half" => "float16",
            "bf16" => "bfloat16",
            "f32" | "float" => "float32",
            "f64" | "double" => "float64",
            "u8" => "uint8",
            "i8" => "int8",
            "u16" => "uint16",
            "i16" => "int16",
            "u32" => "uint32",
            "i32" => "int32",
            "u64" => "uint64",
            "i64" => "int64",
            other => other,
        };
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == alias)
            .ok_or_else(|| TensorError::Decode(format!("unknown element type: {}", s)))
    }
}

/// Element types the renderer can reinterpret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireDtype {
    /// float32
    Float32,
    /// float64
    Float64,
    /// int8
    Int8,
    /// uint8
    Uint8,
    /// int16
    Int16,
    /// int32
    Int32,
    /// int64
    Int64,
}

impl WireDtype {
    /// Name carried in the envelope's `dtype` field
    pub fn name(&self) -> &'static str {
        self.element_type().name()
    }

    /// Size of one wire element in bytes
    pub fn width(&self) -> usize {
        self.element_type().width()
    }

    /// Matching host element type
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Float32 => ElementType::Float32,
            Self::Float64 => ElementType::Float64,
            Self::Int8 => ElementType::Int8,
            Self::Uint8 => ElementType::Uint8,
            Self::Int16 => ElementType::Int16,
            Self::Int32 => ElementType::Int32,
            Self::Int64 => ElementType::Int64,
        }
    }
}

impl fmt::Display for WireDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How one source element type travels over the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DtypeMapping {
    /// Transmission element type
    pub target: WireDtype,
    /// Compression applied after shuffling
    pub compression: Option<CompressionKind>,
    /// Byte shuffle stride (the target element width), if any
    pub shuffle: Option<usize>,
}

const fn entry(target: WireDtype, shuffle: Option<usize>) -> DtypeMapping {
    DtypeMapping {
        target,
        compression: Some(CompressionKind::Zlib),
        shuffle,
    }
}

/// Source element type to wire mapping. float16 widens to float32.
pub static DTYPE_TABLE: [(ElementType, DtypeMapping); 8] = [
    (ElementType::Float16, entry(WireDtype::Float32, Some(4))),
    (ElementType::Float32, entry(WireDtype::Float32, Some(4))),
    (ElementType::Float64, entry(WireDtype::Float64, Some(8))),
    (ElementType::Int8, entry(WireDtype::Int8, None)),
    (ElementType::Uint8, entry(WireDtype::Uint8, None)),
    (ElementType::Int16, entry(WireDtype::Int16, Some(2))),
    (ElementType::Int32, entry(WireDtype::Int32, Some(4))),
    (ElementType::Int64, entry(WireDtype::Int64, Some(8))),
];

/// Fixed-width scalars with a little-endian byte form
pub(crate) trait WireScalar: Copy {
    const WIDTH: usize;

    fn extend_le(self, out: &mut Vec<u8>);

    /// `bytes` is exactly `WIDTH` long
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_wire_scalar {
    ($($ty:ty),*) => {
        $(
            impl WireScalar for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn extend_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buf)
                }
            }
        )*
    };
}

impl_wire_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Serialize scalars to a contiguous little-endian buffer
pub(crate) fn to_le_bytes<T, I>(values: I) -> Vec<u8>
where
    T: WireScalar,
    I: ExactSizeIterator<Item = T>,
{
    let mut out = Vec::with_capacity(values.len() * T::WIDTH);
    for value in values {
        value.extend_le(&mut out);
    }
    out
}

/// Parse a little-endian buffer; trailing bytes short of one element are ignored
pub(crate) fn parse_le<T: WireScalar>(bytes: &[u8]) -> Vec<T> {
    bytes.chunks_exact(T::WIDTH).map(T::read_le).collect()
}
