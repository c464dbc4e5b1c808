//! Per-axis metadata that travels with the tensor's axes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Reorder `items` by `permute`
///
/// Output slot `k` takes `items[permute[k]]`. Indices past the end of
/// `items` yield `None` rather than an error, so metadata shorter than the
/// tensor's rank is padded with nulls. `None` input stays `None`.
pub fn apply_permute<T: Clone>(items: Option<&[T]>, permute: &[usize]) -> Option<Vec<Option<T>>> {
    let items = items?;
    Some(permute.iter().map(|&axis| items.get(axis).cloned()).collect())
}

/// Initial view mode the renderer uses for an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultView {
    /// Show one index at a time
    Slice,
    /// Tile every index side by side
    SmallMultiples,
    /// Reduce the axis with min
    Min,
    /// Reduce the axis with max
    Max,
    /// Reduce the axis with mean
    Mean,
}

impl DefaultView {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultView::Slice => "slice",
            DefaultView::SmallMultiples => "small-multiples",
            DefaultView::Min => "min",
            DefaultView::Max => "max",
            DefaultView::Mean => "mean",
        }
    }
}

impl fmt::Display for DefaultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefaultView {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slice" => Ok(DefaultView::Slice),
            "small-multiples" => Ok(DefaultView::SmallMultiples),
            "min" => Ok(DefaultView::Min),
            "max" => Ok(DefaultView::Max),
            "mean" => Ok(DefaultView::Mean),
            other => Err(WidgetError::UnknownView(other.to_string())),
        }
    }
}

/// Names, tick labels, and default views, one entry per axis
///
/// Each list is optional as a whole, and individual entries may be null
/// once a permutation has padded them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisMetadata {
    /// Axis names
    pub names: Option<Vec<Option<String>>>,
    /// Tick labels per axis
    pub labels: Option<Vec<Option<Vec<String>>>>,
    /// Default view per axis
    pub default_views: Option<Vec<Option<DefaultView>>>,
}

impl AxisMetadata {
    /// Set axis names
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(|n| Some(n.into())).collect());
        self
    }

    /// Set tick labels
    pub fn with_labels<I, L, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(
            labels
                .into_iter()
                .map(|axis| Some(axis.into_iter().map(Into::into).collect()))
                .collect(),
        );
        self
    }

    /// Set default views
    pub fn with_default_views(mut self, views: impl IntoIterator<Item = DefaultView>) -> Self {
        self.default_views = Some(views.into_iter().map(Some).collect());
        self
    }

    /// Reorder every list the same way the tensor's axes are reordered
    pub fn permuted(&self, permute: &[usize]) -> Self {
        Self {
            names: permute_entries(self.names.as_deref(), permute),
            labels: permute_entries(self.labels.as_deref(), permute),
            default_views: permute_entries(self.default_views.as_deref(), permute),
        }
    }
}

fn permute_entries<T: Clone>(
    items: Option<&[Option<T>]>,
    permute: &[usize],
) -> Option<Vec<Option<T>>> {
    apply_permute(items, permute).map(|v| v.into_iter().map(Option::flatten).collect())
}
