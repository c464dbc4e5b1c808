//! Source normalization
//!
//! Tensors arrive from several array ecosystems. Each ecosystem is handled by
//! a [`SourceAdapter`]: a predicate (does this value belong to me?) paired with
//! a converter into [`HostArray`]. Adapters are consulted in registration
//! order and the first match wins. Adapters for optional ecosystems are only
//! compiled in when the matching cargo feature is enabled.

use std::any::{type_name, Any};
use std::marker::PhantomData;
use std::sync::OnceLock;

use crate::array::{checked_byte_len, ArrayData, Element, HostArray};
use crate::dtype::ElementType;
use crate::error::{TensorError, TensorResult};

/// Converts values of one ecosystem into [`HostArray`]
pub trait SourceAdapter: Send + Sync {
    /// Adapter name, used in logs
    fn name(&self) -> &str;

    /// Whether this adapter should be consulted at all
    fn is_active(&self) -> bool {
        true
    }

    /// Convert `input`, or return `None` when it is not this adapter's type
    ///
    /// Adapters for device-resident tensors perform the host copy here.
    fn convert(&self, input: &dyn Any) -> Option<TensorResult<HostArray>>;
}

/// Adapter for a single concrete type `T`
pub struct TypedAdapter<T, F> {
    name: String,
    convert: F,
    _marker: PhantomData<fn(&T)>,
}

impl<T, F> TypedAdapter<T, F>
where
    T: Any,
    F: Fn(&T) -> TensorResult<HostArray> + Send + Sync,
{
    /// Create an adapter that converts `T` with `convert`
    pub fn new(name: impl Into<String>, convert: F) -> Self {
        Self {
            name: name.into(),
            convert,
            _marker: PhantomData,
        }
    }
}

impl<T, F> SourceAdapter for TypedAdapter<T, F>
where
    T: Any,
    F: Fn(&T) -> TensorResult<HostArray> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn convert(&self, input: &dyn Any) -> Option<TensorResult<HostArray>> {
        input.downcast_ref::<T>().map(|value| (self.convert)(value))
    }
}

/// Little-endian byte buffer with an explicit dtype and shape
///
/// This is the layout of safetensors payloads and of raw dumps written by
/// most array libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTensor {
    /// Element type of the buffer
    pub dtype: ElementType,
    /// Dimensions, outermost first
    pub shape: Vec<usize>,
    /// Row-major little-endian element bytes
    pub bytes: Vec<u8>,
}

impl RawTensor {
    /// Create a raw tensor
    pub fn new(dtype: ElementType, shape: Vec<usize>, bytes: Vec<u8>) -> Self {
        Self {
            dtype,
            shape,
            bytes,
        }
    }

    /// Parse into a host array, checking the byte length against the shape
    pub fn to_host(&self) -> TensorResult<HostArray> {
        let expected = checked_byte_len(&self.shape, self.dtype.width())?;
        if self.bytes.len() != expected {
            return Err(TensorError::DataLength {
                expected,
                actual: self.bytes.len(),
            });
        }
        let data = ArrayData::parse_le(self.dtype, &self.bytes)?;
        HostArray::new(self.shape.clone(), data)
    }
}

struct HostAdapter;

impl SourceAdapter for HostAdapter {
    fn name(&self) -> &str {
        "host"
    }

    fn convert(&self, input: &dyn Any) -> Option<TensorResult<HostArray>> {
        input.downcast_ref::<HostArray>().map(|a| Ok(a.clone()))
    }
}

struct RawAdapter;

impl SourceAdapter for RawAdapter {
    fn name(&self) -> &str {
        "raw"
    }

    fn convert(&self, input: &dyn Any) -> Option<TensorResult<HostArray>> {
        input.downcast_ref::<RawTensor>().map(RawTensor::to_host)
    }
}

/// Try each element type in turn
macro_rules! for_each_element {
    ($mac:ident!($($args:tt)*)) => {
        $mac!($($args)*; bool, u8, i8, u16, i16, u32, i32, u64, i64,
            half::f16, half::bf16, f32, f64,
            num_complex::Complex32, num_complex::Complex64)
    };
}

macro_rules! try_vec {
    ($input:expr; $($ty:ty),*) => {
        $(
            if let Some(v) = $input.downcast_ref::<Vec<$ty>>() {
                return Some(HostArray::from_vec(vec![v.len()], v.clone()));
            }
        )*
    };
}

/// Plain vectors become rank-1 arrays
struct VecAdapter;

impl SourceAdapter for VecAdapter {
    fn name(&self) -> &str {
        "vec"
    }

    fn convert(&self, input: &dyn Any) -> Option<TensorResult<HostArray>> {
        for_each_element!(try_vec!(input));
        None
    }
}

#[cfg(feature = "ndarray")]
mod ndarray_source {
    use ndarray::{Array, Array1, Array2, Array3, Array4, ArrayD, Dimension};

    use super::*;

    fn from_ndarray<T: Element, D: Dimension>(array: &Array<T, D>) -> TensorResult<HostArray> {
        // iter() walks logical row-major order whatever the memory layout
        HostArray::from_vec(array.shape().to_vec(), array.iter().copied().collect())
    }

    macro_rules! try_ndarray {
        ($input:expr; $($ty:ty),*) => {
            $(
                if let Some(a) = $input.downcast_ref::<ArrayD<$ty>>() {
                    return Some(from_ndarray(a));
                }
                if let Some(a) = $input.downcast_ref::<Array1<$ty>>() {
                    return Some(from_ndarray(a));
                }
                if let Some(a) = $input.downcast_ref::<Array2<$ty>>() {
                    return Some(from_ndarray(a));
                }
                if let Some(a) = $input.downcast_ref::<Array3<$ty>>() {
                    return Some(from_ndarray(a));
                }
                if let Some(a) = $input.downcast_ref::<Array4<$ty>>() {
                    return Some(from_ndarray(a));
                }
            )*
        };
    }

    /// Owned `ndarray` arrays, dynamic or fixed rank up to 4
    pub(super) struct NdarrayAdapter;

    impl SourceAdapter for NdarrayAdapter {
        fn name(&self) -> &str {
            "ndarray"
        }

        fn convert(&self, input: &dyn Any) -> Option<TensorResult<HostArray>> {
            for_each_element!(try_ndarray!(input));
            None
        }
    }
}

/// Ordered list of source adapters
pub struct SourceRegistry {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

static DEFAULT_REGISTRY: OnceLock<SourceRegistry> = OnceLock::new();

impl SourceRegistry {
    /// Registry with no adapters
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Registry with the built-in adapters for every enabled ecosystem
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(HostAdapter);
        registry.register(RawAdapter);
        registry.register(VecAdapter);
        #[cfg(feature = "ndarray")]
        registry.register(ndarray_source::NdarrayAdapter);
        registry
    }

    /// Process-wide default registry, built on first use
    pub fn global() -> &'static SourceRegistry {
        DEFAULT_REGISTRY.get_or_init(Self::with_defaults)
    }

    /// Append an adapter; earlier adapters take precedence
    pub fn register(&mut self, adapter: impl SourceAdapter + 'static) -> &mut Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    /// Names of registered adapters, in lookup order
    pub fn adapter_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Convert any supported value into a host array
    pub fn to_host<T: Any>(&self, input: &T) -> TensorResult<HostArray> {
        self.to_host_dyn(input, type_name::<T>())
    }

    /// Convert a type-erased value; `type_name` is only used for errors
    pub fn to_host_dyn(&self, input: &dyn Any, type_name: &str) -> TensorResult<HostArray> {
        for adapter in self.adapters.iter().filter(|a| a.is_active()) {
            if let Some(result) = adapter.convert(input) {
                tracing::trace!(
                    adapter = adapter.name(),
                    input = type_name,
                    "source matched"
                );
                return result;
            }
        }
        Err(TensorError::UnsupportedInput(type_name.to_string()))
    }

    /// Convert `input` and apply an optional axis permutation
    pub fn normalize<T: Any>(
        &self,
        input: &T,
        permute: Option<&[usize]>,
    ) -> TensorResult<HostArray> {
        let array = self.to_host(input)?;
        match permute {
            Some(perm) => array.permuted(perm),
            None => Ok(array),
        }
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Normalize `input` with the default registry
pub fn normalize<T: Any>(input: &T, permute: Option<&[usize]>) -> TensorResult<HostArray> {
    SourceRegistry::global().normalize(input, permute)
}
