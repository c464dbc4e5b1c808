//! Properties synced between the widget and the renderer

use serde::{Deserialize, Serialize};

use crate::message::ScaleUpdate;
use crate::metadata::{AxisMetadata, DefaultView};

/// Synced widget properties
///
/// The `current_scale_*` fields are only populated once the renderer has
/// reported its scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetState {
    /// Axis names, in permuted order
    pub names: Option<Vec<Option<String>>>,
    /// Tick labels, in permuted order
    pub labels: Option<Vec<Option<Vec<String>>>>,
    /// Requested scale domain; inferred by the renderer when unset
    pub scale_domain: Option<Vec<f64>>,
    /// Requested scale type; linear when unset
    pub scale_type: Option<String>,
    /// Requested color scheme; inferred by the renderer when unset
    pub scale_scheme: Option<String>,
    /// Default views, in permuted order
    pub default_views: Option<Vec<Option<DefaultView>>>,
    /// Domain the renderer is showing
    pub current_scale_domain: Option<Vec<f64>>,
    /// Scale type the renderer is showing
    pub current_scale_type: Option<String>,
    /// Color scheme the renderer is showing
    pub current_scale_scheme: Option<String>,
}

impl WidgetState {
    /// Build state from (already permuted) axis metadata
    pub fn from_metadata(metadata: AxisMetadata) -> Self {
        Self {
            names: metadata.names,
            labels: metadata.labels,
            default_views: metadata.default_views,
            ..Default::default()
        }
    }

    /// Copy a scale report into the `current_scale_*` fields
    pub fn apply_scale(&mut self, scale: ScaleUpdate) {
        self.current_scale_domain = scale.domain;
        self.current_scale_type = scale.scale_type;
        self.current_scale_scheme = scale.scheme;
    }
}
