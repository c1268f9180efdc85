//! Structuring-service contract.
//!
//! Mined candidates are noisy; an external structuring step (usually a language
//! model) turns them into validated guidance records. This module owns the
//! request shape, tolerant response parsing, and the per-document extraction
//! flow around a pluggable [`Structurer`].

use earnguide_core::{GuidanceCandidate, Source, StructuredDocument};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::dates::filing_date_iso;
use crate::prefilter::mine_candidates;

// ── Prompt template ──

pub const STRUCTURING_PROMPT: &str = "\
Return ONLY a JSON object with an array called items. For each candidate provided,
emit a validated guidance object with keys:
- metric (string)
- guidance_value_text (string, verbatim)
- period (string)
- period_type (\"quarter\" or \"full year\")
- low_end (number or null)
- high_end (number or null)
- units (string or null: 'USD' | 'percent' | 'EPS' | etc.)
- filing_date (YYYY-MM-DD or null)
Discard any candidate that is not forward-looking guidance. Use the short 'context' string if needed to confirm.";

/// Request body for the structuring service: `{"candidates": [...]}`.
pub fn build_structuring_request(candidates: &[GuidanceCandidate]) -> Value {
    json!({ "candidates": candidates })
}

/// Parse a structuring-service response.
///
/// Accepts `{"items": [...]}` or a bare array. Anything else, including invalid
/// JSON, yields no items. Entries are decoded one at a time and malformed ones
/// are dropped.
pub fn parse_structured_response(text: &str) -> Vec<GuidanceCandidate> {
    let value: Value = match serde_json::from_str(text.trim()) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "structuring response is not JSON");
            return Vec::new();
        }
    };

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(entries)) => entries,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let total = entries.len();
    let items: Vec<GuidanceCandidate> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!(index = i, error = %e, "dropping malformed structured entry");
                None
            }
        })
        .collect();

    if items.len() < total {
        info!(kept = items.len(), total, "dropped malformed structured entries");
    }
    items
}

// ── Extraction flow ──

/// Turns mined candidates into structured guidance records.
pub trait Structurer {
    fn structure(&self, candidates: &[GuidanceCandidate]) -> anyhow::Result<Vec<GuidanceCandidate>>;
}

/// Offline structurer: keeps candidates that name a metric and carry a number.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStructurer;

impl Structurer for HeuristicStructurer {
    fn structure(&self, candidates: &[GuidanceCandidate]) -> anyhow::Result<Vec<GuidanceCandidate>> {
        Ok(candidates
            .iter()
            .filter(|c| !c.metric.is_empty() && (c.low_end.is_some() || c.high_end.is_some()))
            .cloned()
            .collect())
    }
}

/// A raw document handed over by the document-text provider.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub source: Source,
    pub source_url: Option<String>,
    pub text: String,
}

/// Mine, structure, and stamp one document's guidance.
///
/// Items missing a source get the document's source; items missing a filing
/// date get the date sniffed from the document head.
pub fn extract_document(
    doc: &SourceDocument,
    structurer: &dyn Structurer,
) -> anyhow::Result<StructuredDocument> {
    let mut out = StructuredDocument {
        source_url: doc.source_url.clone(),
        items: Vec::new(),
    };
    if doc.text.trim().is_empty() {
        return Ok(out);
    }

    let candidates: Vec<GuidanceCandidate> = mine_candidates(&doc.text).collect();
    if candidates.is_empty() {
        debug!(source = %doc.source, "no candidates mined");
        return Ok(out);
    }

    let filing_date = filing_date_iso(&doc.text);
    let mut items = structurer.structure(&candidates)?;
    for item in &mut items {
        item.source = item.source.or(Some(doc.source));
        if item.filing_date.is_none() {
            item.filing_date.clone_from(&filing_date);
        }
    }

    info!(
        source = %doc.source,
        candidates = candidates.len(),
        items = items.len(),
        "structured document"
    );
    out.items = items;
    Ok(out)
}
