//! Paragraph prefilter and candidate mining.
//!
//! Text is split on blank lines, each paragraph's whitespace is collapsed, and
//! only paragraphs that look like guidance (keywords, period tokens, or any
//! number with an optional magnitude suffix) survive. Legal boilerplate is
//! dropped even when it matches. Every step is lazy and a pure function of the
//! input text, so calling [`mine_candidates`] twice yields the same sequence.

use earnguide_core::{GuidanceCandidate, Metric};
use tracing::debug;

use crate::patterns::{
    BOILERPLATE_PHRASES, guidance_re, number_span_re, paragraph_break_re, period_re,
    whitespace_re,
};
use crate::value::normalize_value_span;

/// Characters of paragraph text kept as audit context.
pub const CONTEXT_CHARS: usize = 800;

/// Split on blank lines and collapse internal whitespace. Empty paragraphs are skipped.
pub fn split_paragraphs(text: &str) -> impl Iterator<Item = String> + '_ {
    paragraph_break_re()
        .split(text)
        .map(|p| whitespace_re().replace_all(p, " ").trim().to_string())
        .filter(|p| !p.is_empty())
}

/// Whether a paragraph is legal boilerplate ("safe harbor", "forward-looking statements").
pub fn is_boilerplate(paragraph: &str) -> bool {
    let lower = paragraph.to_lowercase();
    BOILERPLATE_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Paragraphs worth mining.
pub fn prefilter(text: &str) -> impl Iterator<Item = String> + '_ {
    split_paragraphs(text).filter(|p| {
        if !(guidance_re().is_match(p) || number_span_re().is_match(p)) {
            return false;
        }
        if is_boilerplate(p) {
            debug!(len = p.len(), "dropping boilerplate paragraph");
            return false;
        }
        true
    })
}

/// Mine guidance-like candidates from raw document text.
pub fn mine_candidates(text: &str) -> impl Iterator<Item = GuidanceCandidate> + '_ {
    prefilter(text).filter_map(|p| mine_paragraph(&p))
}

/// Extract one candidate from a prefiltered paragraph.
///
/// Returns `None` when the paragraph has neither a period span nor a numeric span.
pub fn mine_paragraph(paragraph: &str) -> Option<GuidanceCandidate> {
    let period = period_re().find(paragraph);
    let number = number_span_re().find(paragraph);
    if period.is_none() && number.is_none() {
        return None;
    }

    let value_text = number.map(|m| m.as_str()).unwrap_or("");
    let value = if value_text.is_empty() {
        Default::default()
    } else {
        normalize_value_span(value_text)
    };

    Some(GuidanceCandidate {
        metric: Metric::detect(paragraph)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        guidance_value_text: value_text.trim().to_string(),
        low_end: value.low,
        high_end: value.high,
        units: value.units.map(str::to_string),
        period: period.map(|m| m.as_str().to_string()).unwrap_or_default(),
        context: Some(paragraph.chars().take(CONTEXT_CHARS).collect()),
        ..Default::default()
    })
}
