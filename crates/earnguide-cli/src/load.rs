//! Reading engine input and tolerance policies from disk.

use std::fs;
use std::path::Path;

use anyhow::Context;
use earnguide_core::{ItemsBySource, StructuredDocument, Tolerance};
use earnguide_merge::collect_by_source;
use serde_json::Value;

/// Load merge input from either an items-by-source map or a list of
/// structured documents (as written by `earnguide extract`).
pub fn load_items(path: &Path) -> anyhow::Result<ItemsBySource> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_items(&text).with_context(|| format!("failed to decode {}", path.display()))
}

fn parse_items(text: &str) -> anyhow::Result<ItemsBySource> {
    let value: Value = serde_json::from_str(text).context("input is not JSON")?;
    if value.is_array() {
        let docs: Vec<StructuredDocument> =
            serde_json::from_value(value).context("expected a list of structured documents")?;
        Ok(collect_by_source(&docs))
    } else {
        Ok(ItemsBySource::from_json(text)?)
    }
}

/// Tolerance policy from a JSON file, or the default policy.
pub fn load_policy(path: Option<&Path>) -> anyhow::Result<Tolerance> {
    let Some(path) = path else {
        return Ok(Tolerance::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read policy {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid policy {}", path.display()))
}
