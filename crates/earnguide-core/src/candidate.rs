//! Guidance records exchanged between the miner, the structuring step, and the merge engine.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::key::CanonicalKey;
use crate::period::PeriodType;
use crate::source::Source;
use crate::units::Unit;
use crate::GuidanceError;

/// A guidance statement as mined from text or returned by the structuring service.
///
/// Every field is optional on the wire so partially-filled records still decode.
/// Unknown fields are ignored, which lets a serialised [`MergedItem`] be read back
/// as a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceCandidate {
    /// Free-text or canonical metric label.
    pub metric: String,
    /// Verbatim numeric span.
    pub guidance_value_text: String,
    pub low_end: Option<f64>,
    pub high_end: Option<f64>,
    /// Free-text unit hint ("USD", "percent", "EPS", ...).
    pub units: Option<String>,
    /// Free-text period ("Q1 FY2024", "full year 2025").
    pub period: String,
    /// Caller-declared classification; only "quarter" and "full year" are honoured.
    pub period_type: Option<String>,
    /// Unrecognised tags decode as `None` rather than rejecting the record.
    #[serde(deserialize_with = "lenient_source")]
    pub source: Option<Source>,
    /// ISO `YYYY-MM-DD`.
    pub filing_date: Option<String>,
    /// Surrounding text kept for audit. Never used in matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Document identifiers (usually URLs) already attributed to this statement.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provenance: Vec<String>,
}

impl GuidanceCandidate {
    /// Canonical key under the period-type override rule.
    pub fn key(&self) -> CanonicalKey {
        CanonicalKey::derive(&self.metric, &self.period, self.period_type.as_deref())
    }

    /// Low/high with a single present bound broadcast to both.
    pub fn broadcast_bounds(&self) -> (Option<f64>, Option<f64>) {
        match (self.low_end, self.high_end) {
            (None, Some(h)) => (Some(h), Some(h)),
            (Some(l), None) => (Some(l), Some(l)),
            other => other,
        }
    }
}

fn lenient_source<'de, D>(deserializer: D) -> Result<Option<Source>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// A document's structured items, as stored after extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredDocument {
    pub source_url: Option<String>,
    pub items: Vec<GuidanceCandidate>,
}

/// Marker set on every representative of a bucket that did not collapse to one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Note {
    Conflict,
}

/// Engine output: one representative value for a canonical-key bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedItem {
    pub metric: String,
    pub guidance_value_text: String,
    pub low_end: Option<f64>,
    pub high_end: Option<f64>,
    pub units: Unit,
    pub period: String,
    pub period_type: PeriodType,
    /// Source of the first item that founded this representative.
    pub source: Source,
    pub filing_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Sorted, deduplicated contributor identifiers.
    pub provenance: BTreeSet<String>,
    pub average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
}

impl MergedItem {
    pub fn key(&self) -> CanonicalKey {
        CanonicalKey::derive(&self.metric, &self.period, Some(self.period_type.as_str()))
    }

    pub fn is_conflict(&self) -> bool {
        self.note == Some(Note::Conflict)
    }

    /// Re-express as engine input.
    pub fn to_candidate(&self) -> GuidanceCandidate {
        GuidanceCandidate {
            metric: self.metric.clone(),
            guidance_value_text: self.guidance_value_text.clone(),
            low_end: self.low_end,
            high_end: self.high_end,
            units: Some(String::from(self.units.clone())),
            period: self.period.clone(),
            period_type: Some(self.period_type.as_str().to_string()),
            source: Some(self.source),
            filing_date: self.filing_date.clone(),
            context: self.context.clone(),
            provenance: self.provenance.iter().cloned().collect(),
        }
    }
}

/// Engine input: structured items grouped by the document type they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemsBySource(BTreeMap<Source, Vec<GuidanceCandidate>>);

impl ItemsBySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a `{"press_release": [...], "transcript": [...]}` mapping.
    ///
    /// Unknown source tags or non-list values are rejected.
    pub fn from_json(text: &str) -> Result<Self, GuidanceError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn push(&mut self, source: Source, item: GuidanceCandidate) {
        self.0.entry(source).or_default().push(item);
    }

    pub fn extend(&mut self, source: Source, items: impl IntoIterator<Item = GuidanceCandidate>) {
        self.0.entry(source).or_default().extend(items);
    }

    /// Iterate sources in [`Source`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Source, &[GuidanceCandidate])> {
        self.0.iter().map(|(s, items)| (*s, items.as_slice()))
    }

    pub fn get(&self, source: Source) -> &[GuidanceCandidate] {
        self.0.get(&source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of items across all sources.
    pub fn item_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

impl FromIterator<(Source, GuidanceCandidate)> for ItemsBySource {
    fn from_iter<I: IntoIterator<Item = (Source, GuidanceCandidate)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (source, item) in iter {
            out.push(source, item);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_decodes_sparse_json() {
        let c: GuidanceCandidate =
            serde_json::from_str(r#"{"metric": "Revenue", "low_end": 94.0}"#).unwrap();
        assert_eq!(c.metric, "Revenue");
        assert_eq!(c.low_end, Some(94.0));
        assert_eq!(c.high_end, None);
        assert!(c.period.is_empty());
        assert!(c.provenance.is_empty());
    }

    #[test]
    fn candidate_ignores_unknown_fields() {
        let c: GuidanceCandidate =
            serde_json::from_str(r#"{"metric": "eps", "average": 1.0, "note": "conflict"}"#)
                .unwrap();
        assert_eq!(c.metric, "eps");
    }

    #[test]
    fn candidate_tolerates_unknown_source_tag() {
        let c: GuidanceCandidate =
            serde_json::from_str(r#"{"metric": "eps", "source": "Press Release"}"#).unwrap();
        assert_eq!(c.source, None);
        let c: GuidanceCandidate =
            serde_json::from_str(r#"{"metric": "eps", "source": "press_release"}"#).unwrap();
        assert_eq!(c.source, Some(Source::PressRelease));
    }

    #[test]
    fn broadcast_single_bound() {
        let c = GuidanceCandidate {
            low_end: Some(5.0),
            ..Default::default()
        };
        assert_eq!(c.broadcast_bounds(), (Some(5.0), Some(5.0)));

        let c = GuidanceCandidate {
            high_end: Some(7.0),
            ..Default::default()
        };
        assert_eq!(c.broadcast_bounds(), (Some(7.0), Some(7.0)));

        let c = GuidanceCandidate::default();
        assert_eq!(c.broadcast_bounds(), (None, None));
    }

    #[test]
    fn items_by_source_from_json() {
        let items = ItemsBySource::from_json(
            r#"{
                "transcript": [{"metric": "revenue", "period": "FY2024"}],
                "press_release": [{"metric": "eps"}, {"metric": "capex"}]
            }"#,
        )
        .unwrap();
        assert_eq!(items.item_count(), 3);
        assert_eq!(items.get(Source::PressRelease).len(), 2);
        assert!(items.get(Source::Presentation).is_empty());

        // Iteration follows Source order regardless of JSON order.
        let order: Vec<Source> = items.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec![Source::PressRelease, Source::Transcript]);
    }

    #[test]
    fn items_by_source_rejects_unknown_tag() {
        let err = ItemsBySource::from_json(r#"{"10k": []}"#).unwrap_err();
        assert!(matches!(err, GuidanceError::MalformedInput(_)));
    }

    #[test]
    fn items_by_source_rejects_non_list() {
        assert!(ItemsBySource::from_json(r#"{"transcript": 5}"#).is_err());
        assert!(ItemsBySource::from_json("not json").is_err());
    }

    #[test]
    fn merged_item_round_trips_through_candidate() {
        let item = MergedItem {
            metric: "Revenue".into(),
            guidance_value_text: "$94 billion".into(),
            low_end: Some(94e9),
            high_end: Some(94e9),
            units: Unit::Usd,
            period: "Q1 FY2024".into(),
            period_type: PeriodType::Quarter,
            source: Source::PressRelease,
            filing_date: Some("2024-02-01".into()),
            context: None,
            provenance: ["press_release".to_string()].into_iter().collect(),
            average: Some(94e9),
            note: None,
        };
        let cand = item.to_candidate();
        assert_eq!(cand.key(), item.key());
        assert_eq!(cand.units.as_deref(), Some("usd"));

        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("note"));
        let back: GuidanceCandidate = serde_json::from_str(&json).unwrap();
        assert_eq!(back.key(), item.key());
        assert_eq!(back.provenance, vec!["press_release".to_string()]);
    }
}
