//! The tensor visualizer widget

use std::any::Any;

use tviz_tensor::{EncoderConfig, Envelope, HostArray, SourceRegistry, TensorEncoder};

use crate::bundle::RendererBundle;
use crate::error::{WidgetError, WidgetResult};
use crate::message::{IncomingMessage, OutgoingMessage, TENSOR_PROP};
use crate::metadata::AxisMetadata;
use crate::state::WidgetState;

/// Construction options for [`TensorVisualizer`]
#[derive(Debug, Clone, Default)]
pub struct VisualizerOptions {
    /// Per-axis metadata, in the tensor's original axis order
    pub metadata: AxisMetadata,
    /// Requested scale domain
    pub scale_domain: Option<Vec<f64>>,
    /// Requested scale type (`linear` or `log`)
    pub scale_type: Option<String>,
    /// Requested color scheme
    pub scale_scheme: Option<String>,
    /// Axis permutation applied to the tensor and its metadata
    pub permute: Option<Vec<usize>>,
    /// Encoder settings
    pub encoder: EncoderConfig,
}

impl VisualizerOptions {
    /// Set axis metadata
    pub fn with_metadata(mut self, metadata: AxisMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the axis permutation
    pub fn with_permute(mut self, permute: Vec<usize>) -> Self {
        self.permute = Some(permute);
        self
    }

    /// Set the requested scale domain
    pub fn with_scale_domain(mut self, domain: Vec<f64>) -> Self {
        self.scale_domain = Some(domain);
        self
    }

    /// Set the requested scale type
    pub fn with_scale_type(mut self, scale_type: impl Into<String>) -> Self {
        self.scale_type = Some(scale_type.into());
        self
    }

    /// Set the requested color scheme
    pub fn with_scale_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scale_scheme = Some(scheme.into());
        self
    }

    /// Set encoder settings
    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }
}

/// Heatmap widget over one tensor
///
/// Keeps the normalized, permuted array so every property read can be
/// answered with a fresh envelope.
#[derive(Debug)]
pub struct TensorVisualizer {
    array: HostArray,
    encoder: TensorEncoder,
    envelope: Envelope,
    state: WidgetState,
}

impl TensorVisualizer {
    /// Create a widget using the default source registry
    pub fn new<T: Any>(tensor: &T, options: VisualizerOptions) -> WidgetResult<Self> {
        Self::with_registry(SourceRegistry::global(), tensor, options)
    }

    /// Create a widget, normalizing `tensor` through `registry`
    ///
    /// Fails before any state is built if the tensor cannot be normalized,
    /// the permutation is invalid, or the dtype has no wire mapping.
    pub fn with_registry<T: Any>(
        registry: &SourceRegistry,
        tensor: &T,
        options: VisualizerOptions,
    ) -> WidgetResult<Self> {
        let permute = options.permute.as_deref();
        let array = registry.normalize(tensor, permute)?;
        let encoder = TensorEncoder::new(options.encoder);
        let envelope = encoder.encode(&array)?;

        let metadata = match permute {
            Some(permute) => options.metadata.permuted(permute),
            None => options.metadata,
        };
        let state = WidgetState {
            scale_domain: options.scale_domain,
            scale_type: options.scale_type,
            scale_scheme: options.scale_scheme,
            ..WidgetState::from_metadata(metadata)
        };

        tracing::debug!(
            shape = ?array.shape(),
            dtype = %array.dtype(),
            "tensor visualizer created"
        );
        Ok(Self {
            array,
            encoder,
            envelope,
            state,
        })
    }

    /// Envelope produced at construction
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Normalized, permuted tensor
    pub fn array(&self) -> &HostArray {
        &self.array
    }

    /// Synced properties
    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Parse and handle a renderer message given as JSON text
    pub fn handle_custom_msg(&mut self, content: &str) -> WidgetResult<Option<OutgoingMessage>> {
        let message: IncomingMessage = serde_json::from_str(content)?;
        self.handle_message(message)
    }

    /// Handle a renderer message
    ///
    /// A `prop` read for `tensor` re-encodes the retained array and returns
    /// the reply to send. A `scale` report updates the `current_scale_*`
    /// properties. Everything else is ignored.
    pub fn handle_message(
        &mut self,
        message: IncomingMessage,
    ) -> WidgetResult<Option<OutgoingMessage>> {
        match message {
            IncomingMessage::Prop { name } if name.as_deref() == Some(TENSOR_PROP) => {
                let envelope = self.encoder.encode(&self.array)?;
                Ok(Some(OutgoingMessage::tensor(envelope)))
            }
            IncomingMessage::Scale { scale } => {
                tracing::trace!(?scale, "scale reported");
                self.state.apply_scale(scale);
                Ok(None)
            }
            other => {
                tracing::trace!(?other, "ignoring message");
                Ok(None)
            }
        }
    }

    /// ES module shim for the installed renderer bundle
    pub fn esm(&self) -> WidgetResult<String> {
        RendererBundle::global()
            .map(RendererBundle::esm)
            .ok_or(WidgetError::BundleMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ScaleUpdate;
    use crate::metadata::DefaultView;
    use tviz_tensor::{ElementType, RawTensor, TensorError};

    fn matrix() -> HostArray {
        HostArray::from_vec(vec![2, 3], vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn test_construct_encodes() {
        let widget = TensorVisualizer::new(&matrix(), VisualizerOptions::default()).unwrap();
        assert_eq!(widget.envelope().shape, vec![2, 3]);
        assert_eq!(widget.envelope().shuffle, Some(4));
        assert_eq!(widget.state().names, None);
    }

    #[test]
    fn test_permute_applies_to_metadata() {
        let options = VisualizerOptions::default()
            .with_metadata(
                AxisMetadata::default()
                    .with_names(["rows", "cols"])
                    .with_default_views([DefaultView::Slice, DefaultView::Mean]),
            )
            .with_permute(vec![1, 0]);
        let widget = TensorVisualizer::new(&matrix(), options).unwrap();

        assert_eq!(widget.envelope().shape, vec![3, 2]);
        assert_eq!(widget.array().shape(), &[3, 2]);
        assert_eq!(
            widget.state().names,
            Some(vec![Some("cols".into()), Some("rows".into())])
        );
        assert_eq!(
            widget.state().default_views,
            Some(vec![Some(DefaultView::Mean), Some(DefaultView::Slice)])
        );
    }

    #[test]
    fn test_requested_scale_is_synced() {
        let options = VisualizerOptions::default()
            .with_scale_domain(vec![0.0, 10.0])
            .with_scale_type("log")
            .with_scale_scheme("viridis");
        let widget = TensorVisualizer::new(&matrix(), options).unwrap();
        assert_eq!(widget.state().scale_domain, Some(vec![0.0, 10.0]));
        assert_eq!(widget.state().scale_type.as_deref(), Some("log"));
        assert_eq!(widget.state().scale_scheme.as_deref(), Some("viridis"));
        assert_eq!(widget.state().current_scale_domain, None);
    }

    #[test]
    fn test_prop_request_replies_with_envelope() {
        let mut widget = TensorVisualizer::new(&matrix(), VisualizerOptions::default()).unwrap();
        let reply = widget
            .handle_custom_msg(r#"{"type":"prop","name":"tensor"}"#)
            .unwrap()
            .unwrap();

        let OutgoingMessage::Prop { value_type, name, value } = reply;
        assert_eq!(value_type, "Tensor");
        assert_eq!(name, "tensor");
        assert_eq!(&value, widget.envelope());
        assert_eq!(value.decode().unwrap(), matrix());
    }

    #[test]
    fn test_other_prop_ignored() {
        let mut widget = TensorVisualizer::new(&matrix(), VisualizerOptions::default()).unwrap();
        assert!(widget
            .handle_custom_msg(r#"{"type":"prop","name":"names"}"#)
            .unwrap()
            .is_none());
        assert!(widget.handle_custom_msg(r#"{"type":"prop"}"#).unwrap().is_none());
    }

    #[test]
    fn test_scale_message_updates_state() {
        let mut widget = TensorVisualizer::new(&matrix(), VisualizerOptions::default()).unwrap();
        let msg = r#"{"type":"scale","scale":{"domain":[1,6],"type":"linear","scheme":"blues"}}"#;
        let reply = widget.handle_custom_msg(msg).unwrap();
        assert!(reply.is_none());
        assert_eq!(widget.state().current_scale_domain, Some(vec![1.0, 6.0]));
        assert_eq!(widget.state().current_scale_type.as_deref(), Some("linear"));
        assert_eq!(widget.state().current_scale_scheme.as_deref(), Some("blues"));

        widget
            .handle_message(IncomingMessage::Scale {
                scale: ScaleUpdate::default(),
            })
            .unwrap();
        assert_eq!(widget.state().current_scale_domain, None);
    }

    #[test]
    fn test_unknown_message_ignored() {
        let mut widget = TensorVisualizer::new(&matrix(), VisualizerOptions::default()).unwrap();
        let before = widget.state().clone();
        assert!(widget.handle_custom_msg(r#"{"type":"resize"}"#).unwrap().is_none());
        assert_eq!(widget.state(), &before);
    }

    #[test]
    fn test_malformed_message() {
        let mut widget = TensorVisualizer::new(&matrix(), VisualizerOptions::default()).unwrap();
        assert!(matches!(
            widget.handle_custom_msg("not json"),
            Err(WidgetError::Message(_))
        ));
    }

    #[test]
    fn test_unsupported_dtype_fails_construction() {
        let raw = RawTensor::new(ElementType::Complex64, vec![1], vec![0u8; 8]);
        let err = TensorVisualizer::new(&raw, VisualizerOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            WidgetError::Tensor(TensorError::UnsupportedDtype(ElementType::Complex64))
        ));
        assert_eq!(err.to_string(), "unsupported dtype complex64");
    }

    #[test]
    fn test_bad_permutation_fails_construction() {
        let options = VisualizerOptions::default().with_permute(vec![0]);
        let err = TensorVisualizer::new(&matrix(), options).unwrap_err();
        assert!(matches!(
            err,
            WidgetError::Tensor(TensorError::ShapeMismatch { rank: 2, len: 1 })
        ));
    }

    #[test]
    fn test_esm_uses_installed_bundle() {
        let mut script = tempfile::NamedTempFile::new().unwrap();
        let source = b"export const renderTensorVisualizer = 0;";
        std::io::Write::write_all(&mut script, source).unwrap();
        let bundle = RendererBundle::install(script.path()).unwrap();

        let widget = TensorVisualizer::new(&matrix(), VisualizerOptions::default()).unwrap();
        let esm = widget.esm().unwrap();
        assert_eq!(esm, bundle.esm());
        assert!(esm.contains(bundle.url()));
    }

    #[test]
    fn test_passthrough_encoder() {
        let options = VisualizerOptions::default().with_encoder(EncoderConfig::passthrough());
        let widget = TensorVisualizer::new(&matrix(), options).unwrap();
        assert_eq!(widget.envelope().compression, None);
        assert_eq!(widget.envelope().shuffle, None);
    }
}
