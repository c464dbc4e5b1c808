//! bundle command - print the renderer's ES module shim

use std::path::Path;

use anyhow::Result;
use tviz_widget::RendererBundle;

/// Execute the bundle command
pub fn execute(path: &Path) -> Result<()> {
    let bundle = RendererBundle::install(path)?;
    print!("{}", bundle.esm());
    Ok(())
}
