//! Canonical in-memory tensor representation

use half::{bf16, f16};
use num_complex::{Complex32, Complex64};

use crate::dtype::{parse_le, ElementType};
use crate::error::{TensorError, TensorResult};

/// Typed, contiguous, row-major element storage
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    /// bool elements
    Bool(Vec<bool>),
    /// u8 elements
    Uint8(Vec<u8>),
    /// i8 elements
    Int8(Vec<i8>),
    /// u16 elements
    Uint16(Vec<u16>),
    /// i16 elements
    Int16(Vec<i16>),
    /// u32 elements
    Uint32(Vec<u32>),
    /// i32 elements
    Int32(Vec<i32>),
    /// u64 elements
    Uint64(Vec<u64>),
    /// i64 elements
    Int64(Vec<i64>),
    /// f16 elements
    Float16(Vec<f16>),
    /// bf16 elements
    Bfloat16(Vec<bf16>),
    /// f32 elements
    Float32(Vec<f32>),
    /// f64 elements
    Float64(Vec<f64>),
    /// complex64 elements
    Complex64(Vec<Complex32>),
    /// complex128 elements
    Complex128(Vec<Complex64>),
}

/// Apply `$body` to the inner vector of any variant
macro_rules! with_data {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            ArrayData::Bool($v) => $body,
            ArrayData::Uint8($v) => $body,
            ArrayData::Int8($v) => $body,
            ArrayData::Uint16($v) => $body,
            ArrayData::Int16($v) => $body,
            ArrayData::Uint32($v) => $body,
            ArrayData::Int32($v) => $body,
            ArrayData::Uint64($v) => $body,
            ArrayData::Int64($v) => $body,
            ArrayData::Float16($v) => $body,
            ArrayData::Bfloat16($v) => $body,
            ArrayData::Float32($v) => $body,
            ArrayData::Float64($v) => $body,
            ArrayData::Complex64($v) => $body,
            ArrayData::Complex128($v) => $body,
        }
    };
}

/// Like `with_data!`, rewrapping the result in the same variant
macro_rules! map_data {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            ArrayData::Bool($v) => ArrayData::Bool($body),
            ArrayData::Uint8($v) => ArrayData::Uint8($body),
            ArrayData::Int8($v) => ArrayData::Int8($body),
            ArrayData::Uint16($v) => ArrayData::Uint16($body),
            ArrayData::Int16($v) => ArrayData::Int16($body),
            ArrayData::Uint32($v) => ArrayData::Uint32($body),
            ArrayData::Int32($v) => ArrayData::Int32($body),
            ArrayData::Uint64($v) => ArrayData::Uint64($body),
            ArrayData::Int64($v) => ArrayData::Int64($body),
            ArrayData::Float16($v) => ArrayData::Float16($body),
            ArrayData::Bfloat16($v) => ArrayData::Bfloat16($body),
            ArrayData::Float32($v) => ArrayData::Float32($body),
            ArrayData::Float64($v) => ArrayData::Float64($body),
            ArrayData::Complex64($v) => ArrayData::Complex64($body),
            ArrayData::Complex128($v) => ArrayData::Complex128($body),
        }
    };
}

impl ArrayData {
    /// Element type of the stored values
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Bool(_) => ElementType::Bool,
            Self::Uint8(_) => ElementType::Uint8,
            Self::Int8(_) => ElementType::Int8,
            Self::Uint16(_) => ElementType::Uint16,
            Self::Int16(_) => ElementType::Int16,
            Self::Uint32(_) => ElementType::Uint32,
            Self::Int32(_) => ElementType::Int32,
            Self::Uint64(_) => ElementType::Uint64,
            Self::Int64(_) => ElementType::Int64,
            Self::Float16(_) => ElementType::Float16,
            Self::Bfloat16(_) => ElementType::Bfloat16,
            Self::Float32(_) => ElementType::Float32,
            Self::Float64(_) => ElementType::Float64,
            Self::Complex64(_) => ElementType::Complex64,
            Self::Complex128(_) => ElementType::Complex128,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        with_data!(self, v => v.len())
    }

    /// True when there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Debug-formatted text of the first `limit` elements
    pub fn preview(&self, limit: usize) -> Vec<String> {
        with_data!(self, v => v.iter().take(limit).map(|x| format!("{:?}", x)).collect())
    }

    /// Parse a little-endian buffer of `dtype` elements
    ///
    /// Complex values are stored as interleaved `(re, im)` pairs and booleans
    /// as one byte each, nonzero meaning true.
    pub fn parse_le(dtype: ElementType, bytes: &[u8]) -> TensorResult<Self> {
        let width = dtype.width();
        if bytes.len() % width != 0 {
            return Err(TensorError::Decode(format!(
                "{} bytes is not a whole number of {} elements",
                bytes.len(),
                dtype
            )));
        }
        let data = match dtype {
            ElementType::Bool => Self::Bool(bytes.iter().map(|&b| b != 0).collect()),
            ElementType::Uint8 => Self::Uint8(bytes.to_vec()),
            ElementType::Int8 => Self::Int8(parse_le(bytes)),
            ElementType::Uint16 => Self::Uint16(parse_le(bytes)),
            ElementType::Int16 => Self::Int16(parse_le(bytes)),
            ElementType::Uint32 => Self::Uint32(parse_le(bytes)),
            ElementType::Int32 => Self::Int32(parse_le(bytes)),
            ElementType::Uint64 => Self::Uint64(parse_le(bytes)),
            ElementType::Int64 => Self::Int64(parse_le(bytes)),
            ElementType::Float16 => Self::Float16(
                parse_le::<u16>(bytes)
                    .into_iter()
                    .map(f16::from_bits)
                    .collect(),
            ),
            ElementType::Bfloat16 => Self::Bfloat16(
                parse_le::<u16>(bytes)
                    .into_iter()
                    .map(bf16::from_bits)
                    .collect(),
            ),
            ElementType::Float32 => Self::Float32(parse_le(bytes)),
            ElementType::Float64 => Self::Float64(parse_le(bytes)),
            ElementType::Complex64 => Self::Complex64(
                parse_le::<f32>(bytes)
                    .chunks_exact(2)
                    .map(|p| Complex32::new(p[0], p[1]))
                    .collect(),
            ),
            ElementType::Complex128 => Self::Complex128(
                parse_le::<f64>(bytes)
                    .chunks_exact(2)
                    .map(|p| Complex64::new(p[0], p[1]))
                    .collect(),
            ),
        };
        Ok(data)
    }
}

/// Rust scalar types that map onto an [`ArrayData`] variant
pub trait Element: Copy + Send + Sync + 'static {
    /// Element type tag
    const TYPE: ElementType;

    /// Wrap a vector in its variant
    fn into_data(values: Vec<Self>) -> ArrayData;

    /// Borrow the values if `data` holds this type
    fn slice(data: &ArrayData) -> Option<&[Self]>;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const TYPE: ElementType = ElementType::$variant;

                fn into_data(values: Vec<Self>) -> ArrayData {
                    ArrayData::$variant(values)
                }

                fn slice(data: &ArrayData) -> Option<&[Self]> {
                    match data {
                        ArrayData::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_element!(
    bool => Bool,
    u8 => Uint8,
    i8 => Int8,
    u16 => Uint16,
    i16 => Int16,
    u32 => Uint32,
    i32 => Int32,
    u64 => Uint64,
    i64 => Int64,
    f16 => Float16,
    bf16 => Bfloat16,
    f32 => Float32,
    f64 => Float64,
    Complex32 => Complex64,
    Complex64 => Complex128,
);

/// Host-resident, row-major n-dimensional array
///
/// This is the canonical form every source adapter converts into. The element
/// count always equals the product of the shape (1 for a rank-0 scalar).
#[derive(Debug, Clone, PartialEq)]
pub struct HostArray {
    shape: Vec<usize>,
    data: ArrayData,
}

impl HostArray {
    /// Create an array, validating the element count against the shape
    pub fn new(shape: Vec<usize>, data: ArrayData) -> TensorResult<Self> {
        let expected = checked_element_count(&shape)?;
        if expected != data.len() {
            return Err(TensorError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Create an array from a typed vector
    pub fn from_vec<T: Element>(shape: Vec<usize>, values: Vec<T>) -> TensorResult<Self> {
        Self::new(shape, T::into_data(values))
    }

    /// Dimensions, outermost first
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the array holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element type
    pub fn dtype(&self) -> ElementType {
        self.data.element_type()
    }

    /// Typed storage
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Borrow the elements as `T`, if that is the stored type
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.data)
    }

    /// Split into shape and storage
    pub fn into_parts(self) -> (Vec<usize>, ArrayData) {
        (self.shape, self.data)
    }

    /// Reorder axes so that output axis `i` is input axis `perm[i]`
    ///
    /// The result is physically re-laid-out in row-major order for the new
    /// shape; it is not a strided view.
    pub fn permuted(&self, perm: &[usize]) -> TensorResult<Self> {
        validate_permutation(perm, self.rank())?;
        if perm.iter().enumerate().all(|(i, &p)| i == p) {
            return Ok(self.clone());
        }

        let shape: Vec<usize> = perm.iter().map(|&p| self.shape[p]).collect();
        let data = map_data!(&self.data, v => permute_elements(v.as_slice(), &self.shape, perm));
        Ok(Self { shape, data })
    }
}

/// Product of `shape`, failing instead of wrapping on overflow
pub fn checked_element_count(shape: &[usize]) -> TensorResult<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| TensorError::ShapeOverflow {
            shape: shape.to_vec(),
        })
}

/// Byte length of a `shape` tensor with `width`-byte elements
pub fn checked_byte_len(shape: &[usize], width: usize) -> TensorResult<usize> {
    checked_element_count(shape)?
        .checked_mul(width)
        .ok_or_else(|| TensorError::ShapeOverflow {
            shape: shape.to_vec(),
        })
}

/// Check that `perm` is a bijection over `0..rank`
pub fn validate_permutation(perm: &[usize], rank: usize) -> TensorResult<()> {
    if perm.len() != rank {
        return Err(TensorError::ShapeMismatch {
            rank,
            len: perm.len(),
        });
    }
    let mut seen = vec![false; rank];
    for &axis in perm {
        if axis >= rank || seen[axis] {
            return Err(TensorError::InvalidPermutation { axis, rank });
        }
        seen[axis] = true;
    }
    Ok(())
}

/// Row-major strides in elements (last axis varies fastest)
pub fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Gather `src` into the row-major order of the permuted shape
fn permute_elements<T: Copy>(src: &[T], shape: &[usize], perm: &[usize]) -> Vec<T> {
    let src_strides = row_major_strides(shape);
    let dims: Vec<usize> = perm.iter().map(|&p| shape[p]).collect();
    let strides: Vec<usize> = perm.iter().map(|&p| src_strides[p]).collect();

    let mut out = Vec::with_capacity(src.len());
    if src.is_empty() {
        return out;
    }

    // odometer over output indices, tracking the matching source offset
    let mut index = vec![0usize; dims.len()];
    let mut offset = 0usize;
    for _ in 0..src.len() {
        out.push(src[offset]);
        for axis in (0..dims.len()).rev() {
            index[axis] += 1;
            offset += strides[axis];
            if index[axis] < dims[axis] {
                break;
            }
            offset -= strides[axis] * dims[axis];
            index[axis] = 0;
        }
    }
    out
}
