//! Numeric span normalisation: "$90 bn to $94 bn" → (USD, 90e9, 94e9).
//!
//! Each side of a range is parsed on its own, so a magnitude word only scales
//! the side it appears on. Bounds are not broadcast here; a single-sided value
//! leaves `high` empty and the merge engine fills it in.

use crate::patterns::{million_suffix_re, range_split_re};

/// Parsed numeric span.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValueSpan {
    /// Coarse unit guess: "EPS", "USD", or "percent".
    pub units: Option<&'static str>,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// Normalise a verbatim numeric span. Never fails; unparseable sides become `None`.
pub fn normalize_value_span(span: &str) -> ValueSpan {
    let t = span.to_lowercase().replace(',', "");
    let t = t.trim();

    let parts: Vec<&str> = range_split_re().split(t).collect();
    let (low, high) = match parts.as_slice() {
        [low, high] => (parse_bound(low), parse_bound(high)),
        _ => (parse_bound(t), None),
    };

    ValueSpan {
        units: guess_units(t),
        low,
        high,
    }
}

fn guess_units(t: &str) -> Option<&'static str> {
    if t.contains("eps") {
        Some("EPS")
    } else if ["billion", "bn", "$", "million", " m"]
        .iter()
        .any(|marker| t.contains(marker))
    {
        Some("USD")
    } else if t.contains('%') || t.contains("percent") {
        Some("percent")
    } else {
        None
    }
}

fn parse_bound(side: &str) -> Option<f64> {
    let x = side.replace("about", "").replace("approx", "").replace('$', "");
    let x = x.trim();

    let mult = if x.contains("billion") || x.contains("bn") {
        1e9
    } else if x.contains("million") || million_suffix_re().is_match(x) {
        1e6
    } else {
        1.0
    };

    let digits: String = x
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if !digits.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<f64>().ok().map(|v| v * mult)
}
