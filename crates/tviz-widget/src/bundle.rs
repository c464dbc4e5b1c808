//! Renderer script bundle
//!
//! The compiled renderer is shipped to the front-end inline, as a base64
//! `data:` URL imported by a small ES module shim.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{WidgetError, WidgetResult};

const DATA_URL_PREFIX: &str = "data:text/javascript;base64,";

static BUNDLE: OnceLock<RendererBundle> = OnceLock::new();

/// Renderer script loaded from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererBundle {
    path: PathBuf,
    url: String,
}

impl RendererBundle {
    /// Read the script at `path` and build its data URL
    pub fn load(path: &Path) -> WidgetResult<Self> {
        let script = std::fs::read_to_string(path).map_err(|source| WidgetError::Bundle {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = script.len(), "loaded renderer bundle");
        Ok(Self::from_script(path, &script))
    }

    fn from_script(path: &Path, script: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            url: format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(script.as_bytes())),
        }
    }

    /// Load the process-wide bundle, once
    ///
    /// Later calls return the bundle already installed and ignore `path`.
    pub fn install(path: &Path) -> WidgetResult<&'static RendererBundle> {
        if let Some(bundle) = BUNDLE.get() {
            if bundle.path != path {
                tracing::warn!(
                    installed = %bundle.path.display(),
                    requested = %path.display(),
                    "renderer bundle already installed"
                );
            }
            return Ok(bundle);
        }
        let loaded = Self::load(path)?;
        Ok(BUNDLE.get_or_init(|| loaded))
    }

    /// The process-wide bundle, if one was installed
    pub fn global() -> Option<&'static RendererBundle> {
        BUNDLE.get()
    }

    /// Path the script was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `data:text/javascript;base64,...` URL of the script
    pub fn url(&self) -> &str {
        &self.url
    }

    /// ES module that re-exports the renderer's entry point as `render`
    pub fn esm(&self) -> String {
        format!(
            "import {{ renderTensorVisualizer }} from \"{}\";\n\
             const render = renderTensorVisualizer;\n\
             export default {{ render }};\n",
            self.url
        )
    }
}
