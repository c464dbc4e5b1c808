//! decode command - summarize an envelope

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tviz_tensor::Envelope;

/// Execute the decode command
pub fn execute(path: &Path, head: usize) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let envelope = Envelope::from_json(&text).context("Invalid envelope JSON")?;
    let (shape, data) = envelope
        .decode()
        .context("Failed to decode envelope payload")?
        .into_parts();

    println!("{}", style("Envelope").bold().cyan());
    println!("{}", style("=".repeat(40)).dim());
    println!("Shape:       {:?}", shape);
    println!("Dtype:       {}", envelope.dtype);
    println!(
        "Compression: {}",
        envelope.compression.map_or("none".to_string(), |c| c.to_string())
    );
    println!(
        "Shuffle:     {}",
        envelope.shuffle.map_or("none".to_string(), |s| s.to_string())
    );
    println!("Elements:    {}", data.len());

    let preview = data.preview(head);
    let more = if data.len() > preview.len() { ", ..." } else { "" };
    println!("Values:      [{}{}]", preview.join(", "), more);
    Ok(())
}
