//! Tensor encoding pipeline for the tensor visualizer
//!
//! Turns an n-dimensional numeric array into a compact JSON envelope the
//! front-end renderer can decode without any other context.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   caller tensors (HostArray, RawTensor, Vec<T>, ndarray, ..) │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼───────────────────────────────┐
//! │ SourceRegistry: first active adapter wins, then permutation  │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ HostArray (row-major)
//! ┌──────────────────────────────▼───────────────────────────────┐
//! │ TensorEncoder                                                │
//! │  dtype table → cast → LE bytes → shuffle → zlib → base64     │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//!                     Envelope { shape, compression, shuffle, dtype, data }
//! ```
//!
//! # Example
//!
//! ```
//! use tviz_tensor::{tensor_to_envelope, HostArray};
//!
//! let array = HostArray::from_vec(vec![2, 3], vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0])?;
//! let envelope = tensor_to_envelope(&array, Some(&[1, 0]))?;
//! assert_eq!(envelope.shape, vec![3, 2]);
//! assert_eq!(envelope.shuffle, Some(4));
//! # Ok::<(), tviz_tensor::TensorError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod array;
pub mod config;
pub mod dtype;
pub mod encode;
pub mod envelope;
pub mod error;
pub mod source;

pub use array::{validate_permutation, ArrayData, Element, HostArray};
pub use config::{CompressionConfig, EncoderConfig};
pub use dtype::{DtypeMapping, ElementType, WireDtype, DTYPE_TABLE};
pub use encode::{encode, tensor_to_envelope, TensorEncoder};
pub use envelope::Envelope;
pub use error::{TensorError, TensorResult};
pub use source::{normalize, RawTensor, SourceAdapter, SourceRegistry, TypedAdapter};
pub use tviz_compress::CompressionKind;
