//! Conflict grouping and resolution.
//!
//! The engine flags conflicts but never chooses. A reviewer (or a stored
//! earlier choice) picks one representative per conflicting key; [`finalize`]
//! then reduces merged output to exactly one row per canonical key.

use std::collections::HashMap;

use earnguide_core::{CanonicalKey, MergedItem};
use serde::{Deserialize, Serialize};

/// A recorded choice for one canonical key of one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub ticker: String,
    /// Numeric fiscal year, or 0 when the key has none.
    pub fiscal_year: i32,
    /// "Q1".."Q4", or empty for full-year keys.
    pub quarter: String,
    /// [`CanonicalKey::resolution_key`] of the chosen item.
    pub metric_key: String,
    pub chosen: MergedItem,
}

impl Resolution {
    pub fn new(ticker: &str, chosen: MergedItem) -> Self {
        let key = chosen.key();
        Self {
            ticker: ticker.trim().to_uppercase(),
            fiscal_year: key
                .fiscal_year
                .as_deref()
                .and_then(|fy| fy.parse().ok())
                .unwrap_or(0),
            quarter: key.quarter.clone().unwrap_or_default(),
            metric_key: key.resolution_key(),
            chosen,
        }
    }
}

/// Merged items regrouped by canonical key, in first-encounter order.
pub fn group_by_key(merged: &[MergedItem]) -> Vec<(CanonicalKey, Vec<MergedItem>)> {
    let mut index: HashMap<CanonicalKey, usize> = HashMap::new();
    let mut groups: Vec<(CanonicalKey, Vec<MergedItem>)> = Vec::new();
    for item in merged {
        let key = item.key();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(item.clone());
    }
    groups
}

/// Groups that need a choice.
pub fn conflict_groups(
    groups: &[(CanonicalKey, Vec<MergedItem>)],
) -> impl Iterator<Item = &(CanonicalKey, Vec<MergedItem>)> {
    groups.iter().filter(|(_, items)| items.len() > 1)
}

/// Index of the item matching a stored choice on source, display text, and
/// both bounds. Falls back to 0.
pub fn preselect_index(items: &[MergedItem], chosen: Option<&MergedItem>) -> usize {
    let Some(chosen) = chosen else {
        return 0;
    };
    items
        .iter()
        .position(|it| {
            it.source == chosen.source
                && it.guidance_value_text == chosen.guidance_value_text
                && it.low_end == chosen.low_end
                && it.high_end == chosen.high_end
        })
        .unwrap_or(0)
}

/// One item per key. Single-item groups pass through; a conflict group takes
/// the item at its chosen index (keyed by resolution key, default 0, clamped
/// to the group).
pub fn finalize(
    groups: &[(CanonicalKey, Vec<MergedItem>)],
    choices: &HashMap<String, usize>,
) -> Vec<MergedItem> {
    groups
        .iter()
        .filter_map(|(key, items)| {
            let idx = match items.len() {
                0 => return None,
                1 => 0,
                n => choices
                    .get(&key.resolution_key())
                    .copied()
                    .unwrap_or(0)
                    .min(n - 1),
            };
            Some(items[idx].clone())
        })
        .collect()
}

/// Choices derived from stored resolutions, one per conflict group.
pub fn preselect_choices<'a>(
    groups: &[(CanonicalKey, Vec<MergedItem>)],
    stored: impl IntoIterator<Item = &'a Resolution>,
) -> HashMap<String, usize> {
    let by_key: HashMap<&str, &MergedItem> = stored
        .into_iter()
        .map(|r| (r.metric_key.as_str(), &r.chosen))
        .collect();
    conflict_groups(groups)
        .map(|(key, items)| {
            let rk = key.resolution_key();
            let idx = preselect_index(items, by_key.get(rk.as_str()).copied());
            (rk, idx)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::merge_items;
    use earnguide_core::{GuidanceCandidate, ItemsBySource, Source};

    fn cand(metric: &str, period: &str, units: &str, low: f64) -> GuidanceCandidate {
        GuidanceCandidate {
            metric: metric.into(),
            period: period.into(),
            units: Some(units.into()),
            low_end: Some(low),
            guidance_value_text: format!("{low}"),
            ..Default::default()
        }
    }

    fn sample() -> Vec<MergedItem> {
        let input: ItemsBySource = [
            (Source::PressRelease, cand("eps", "Q1 FY2024", "eps", 1.00)),
            (Source::PressRelease, cand("revenue", "FY2025", "usd", 400.0)),
            (Source::Presentation, cand("eps", "Q1 FY2024", "eps", 1.10)),
            (Source::Transcript, cand("eps", "Q1 FY2024", "eps", 1.05)),
        ]
        .into_iter()
        .collect();
        merge_items(&input)
    }

    #[test]
    fn groups_and_conflicts() {
        let groups = group_by_key(&sample());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.resolution_key(), "eps|quarter|2024|Q1");
        assert_eq!(groups[0].1.len(), 3);

        let conflicts: Vec<_> = conflict_groups(&groups).collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].0.label(), "eps — Q1 FY2024 (quarter)");
    }

    #[test]
    fn preselect_matches_stored_choice() {
        let groups = group_by_key(&sample());
        let eps = &groups[0].1;
        assert_eq!(preselect_index(eps, None), 0);
        assert_eq!(preselect_index(eps, Some(&eps[2])), 2);

        let mut stale = eps[1].clone();
        stale.guidance_value_text = "changed".into();
        assert_eq!(preselect_index(eps, Some(&stale)), 0);
    }

    #[test]
    fn finalize_one_per_key() {
        let groups = group_by_key(&sample());
        let out = finalize(&groups, &HashMap::new());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].low_end, Some(1.00));

        let choices = HashMap::from([("eps|quarter|2024|Q1".to_string(), 1)]);
        let out = finalize(&groups, &choices);
        assert_eq!(out[0].low_end, Some(1.10));
        assert_eq!(out[1].metric, "revenue");
    }

    #[test]
    fn finalize_clamps_choice() {
        let groups = group_by_key(&sample());
        let choices = HashMap::from([("eps|quarter|2024|Q1".to_string(), 99)]);
        let out = finalize(&groups, &choices);
        assert_eq!(out[0].low_end, Some(1.05));
    }

    #[test]
    fn resolution_from_item() {
        let groups = group_by_key(&sample());
        let r = Resolution::new(" aapl ", groups[0].1[1].clone());
        assert_eq!(r.ticker, "AAPL");
        assert_eq!(r.fiscal_year, 2024);
        assert_eq!(r.quarter, "Q1");
        assert_eq!(r.metric_key, "eps|quarter|2024|Q1");

        let r = Resolution::new("AAPL", groups[1].1[0].clone());
        assert_eq!(r.quarter, "");
        assert_eq!(r.metric_key, "revenue|full year|2025|");
    }

    #[test]
    fn stored_resolutions_drive_choices() {
        let groups = group_by_key(&sample());
        let stored = vec![Resolution::new("AAPL", groups[0].1[2].clone())];
        let choices = preselect_choices(&groups, &stored);
        assert_eq!(choices.get("eps|quarter|2024|Q1"), Some(&2));
        assert_eq!(choices.len(), 1);

        let out = finalize(&groups, &choices);
        assert_eq!(out[0].low_end, Some(1.05));
    }
}
