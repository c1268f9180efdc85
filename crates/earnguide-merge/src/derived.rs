//! Derived fields and output invariants.

use std::collections::HashMap;

use earnguide_core::{
    CanonicalKey, GuidanceError, MergedItem, Note, Tolerance, canonicalize_period,
};

use crate::engine::Representative;

/// Midpoint of the bounds when both are present.
pub fn average(low: Option<f64>, high: Option<f64>) -> Option<f64> {
    match (low, high) {
        (Some(l), Some(h)) => Some((l + h) / 2.0),
        _ => None,
    }
}

/// Turn a finished representative into output, computing the average and
/// backfilling an undeclared period type from the period text.
pub(crate) fn finish(rep: Representative, conflict: bool) -> MergedItem {
    let Representative {
        source,
        units,
        item,
        period_type,
        provenance,
    } = rep;

    debug_assert_eq!(
        item.low_end.is_some(),
        item.high_end.is_some(),
        "bounds must be broadcast before finishing"
    );
    debug_assert!(!provenance.is_empty(), "representative without contributors");

    let period_type = period_type.unwrap_or_else(|| canonicalize_period(&item.period).period_type);

    MergedItem {
        metric: item.metric,
        guidance_value_text: item.guidance_value_text,
        average: average(item.low_end, item.high_end),
        low_end: item.low_end,
        high_end: item.high_end,
        units,
        period: item.period,
        period_type,
        source,
        filing_date: item.filing_date,
        context: item.context,
        provenance,
        note: conflict.then_some(Note::Conflict),
    }
}

fn violation(item: &MergedItem, detail: impl Into<String>) -> GuidanceError {
    GuidanceError::Invariant {
        metric: item.metric.clone(),
        period: item.period.clone(),
        detail: detail.into(),
    }
}

/// Check merged output against the engine's guarantees.
///
/// - bounds are both present or both absent, and `average` is their midpoint
/// - provenance is non-empty
/// - a key with several items has every item flagged as a conflict, and no two
///   of them are tolerance-equal; a key with one item is not flagged
pub fn check_invariants(items: &[MergedItem], tolerance: &Tolerance) -> Result<(), GuidanceError> {
    let mut by_key: HashMap<CanonicalKey, Vec<&MergedItem>> = HashMap::new();

    for item in items {
        if item.low_end.is_some() != item.high_end.is_some() {
            return Err(violation(item, "only one bound present"));
        }
        if item.average != average(item.low_end, item.high_end) {
            return Err(violation(item, "average is not the midpoint of the bounds"));
        }
        if item.provenance.is_empty() {
            return Err(violation(item, "empty provenance"));
        }
        by_key.entry(item.key()).or_default().push(item);
    }

    for group in by_key.values() {
        if group.len() == 1 {
            if group[0].is_conflict() {
                return Err(violation(group[0], "conflict note on a single-item key"));
            }
            continue;
        }
        for (i, a) in group.iter().enumerate() {
            if !a.is_conflict() {
                return Err(violation(a, "multi-item key without conflict note"));
            }
            for b in &group[i + 1..] {
                let equal = a.units == b.units
                    && tolerance.close_enough(a.low_end, b.low_end, &a.units)
                    && tolerance.close_enough(a.high_end, b.high_end, &a.units);
                if equal {
                    return Err(violation(a, "two conflict items are tolerance-equal"));
                }
            }
        }
    }
    Ok(())
}
