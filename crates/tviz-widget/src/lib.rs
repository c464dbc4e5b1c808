//! Widget shell for the tensor visualizer
//!
//! Holds the synced widget state, answers the renderer's property-read
//! requests with freshly encoded envelopes, and records the scale the
//! renderer reports back.
//!
//! ```
//! use tviz_tensor::HostArray;
//! use tviz_widget::{AxisMetadata, OutgoingMessage, TensorVisualizer, VisualizerOptions};
//!
//! let array = HostArray::from_vec(vec![2, 3], vec![0i32; 6])?;
//! let options = VisualizerOptions::default()
//!     .with_metadata(AxisMetadata::default().with_names(["rows", "cols"]))
//!     .with_permute(vec![1, 0]);
//! let mut widget = TensorVisualizer::new(&array, options)?;
//! assert_eq!(widget.envelope().shape, vec![3, 2]);
//!
//! let reply = widget.handle_custom_msg(r#"{"type":"prop","name":"tensor"}"#)?;
//! assert!(matches!(reply, Some(OutgoingMessage::Prop { .. })));
//! # Ok::<(), tviz_widget::WidgetError>(())
//! ```

#![warn(missing_docs)]

pub mod bundle;
pub mod error;
pub mod message;
pub mod metadata;
pub mod state;
pub mod widget;

pub use bundle::RendererBundle;
pub use error::{WidgetError, WidgetResult};
pub use message::{IncomingMessage, OutgoingMessage, ScaleUpdate};
pub use metadata::{apply_permute, AxisMetadata, DefaultView};
pub use state::WidgetState;
pub use widget::{TensorVisualizer, VisualizerOptions};
