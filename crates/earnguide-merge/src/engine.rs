//! Merge/dedup engine.
//!
//! Items are bucketed by canonical key. Within a bucket they are visited in
//! descending source rank (stable, so equal ranks keep encounter order) and
//! folded into representatives: an item whose bounds are tolerance-equal to a
//! representative with the same unit merges into it, otherwise it founds a new
//! one. A bucket left with more than one representative is a conflict; the
//! engine never picks a winner.
//!
//! The engine only reads its input. Every representative is built from a copy.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use earnguide_core::{
    CanonicalKey, GuidanceCandidate, ItemsBySource, MergedItem, PeriodType, Source, Tolerance,
    Unit,
};
use tracing::{debug, info};

use crate::derived;

/// One normalised item inside a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketEntry {
    /// Source the item was filed under. This is what ranks it.
    pub source: Source,
    pub units: Unit,
    /// Copy of the input with bounds broadcast, units canonicalised, and
    /// `source` defaulted to the filing source.
    pub item: GuidanceCandidate,
}

impl BucketEntry {
    fn new(source: Source, item: &GuidanceCandidate) -> Self {
        let units = Unit::canonicalize(item.units.as_deref());
        let (low_end, high_end) = item.broadcast_bounds();
        let item = GuidanceCandidate {
            low_end,
            high_end,
            units: Some(units.to_string()),
            source: Some(item.source.unwrap_or(source)),
            ..item.clone()
        };
        Self {
            source,
            units,
            item,
        }
    }

    /// Identifiers this entry contributes to provenance: its own provenance
    /// entries, or the filing source tag when it carries none.
    fn contributors(&self) -> BTreeSet<String> {
        if self.item.provenance.is_empty() {
            BTreeSet::from([self.source.as_str().to_string()])
        } else {
            self.item.provenance.iter().cloned().collect()
        }
    }
}

/// Group items by canonical key, in first-encounter order.
///
/// Sources are visited in [`Source`] order and items in list order.
pub fn bucketize(items_by_source: &ItemsBySource) -> Vec<(CanonicalKey, Vec<BucketEntry>)> {
    let mut index: HashMap<CanonicalKey, usize> = HashMap::new();
    let mut buckets: Vec<(CanonicalKey, Vec<BucketEntry>)> = Vec::new();

    for (source, items) in items_by_source.iter() {
        for item in items {
            let key = item.key();
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                buckets.push((key, Vec::new()));
                buckets.len() - 1
            });
            buckets[slot].1.push(BucketEntry::new(source, item));
        }
    }
    buckets
}

/// A bucket representative under construction.
#[derive(Debug, Clone)]
pub(crate) struct Representative {
    pub(crate) source: Source,
    pub(crate) units: Unit,
    pub(crate) item: GuidanceCandidate,
    /// Caller-declared period type, if recognised. Backfilled in the derived pass.
    pub(crate) period_type: Option<PeriodType>,
    pub(crate) provenance: BTreeSet<String>,
}

impl Representative {
    fn found(entry: &BucketEntry) -> Self {
        Self {
            source: entry.source,
            units: entry.units.clone(),
            item: entry.item.clone(),
            period_type: entry.item.period_type.as_deref().and_then(PeriodType::parse),
            provenance: entry.contributors(),
        }
    }

    fn matches(&self, entry: &BucketEntry, tolerance: &Tolerance) -> bool {
        self.units == entry.units
            && tolerance.close_enough(entry.item.low_end, self.item.low_end, &entry.units)
            && tolerance.close_enough(entry.item.high_end, self.item.high_end, &entry.units)
    }

    /// Fold a tolerance-equal entry in. Provenance only grows; display fields
    /// move to the entry only when it outranks the founding source.
    fn absorb(&mut self, entry: &BucketEntry) {
        self.provenance.extend(entry.contributors());
        if entry.source.rank() > self.source.rank() {
            if !entry.item.guidance_value_text.is_empty() {
                self.item
                    .guidance_value_text
                    .clone_from(&entry.item.guidance_value_text);
            }
            if entry.item.filing_date.is_some() {
                self.item.filing_date.clone_from(&entry.item.filing_date);
            }
        }
    }
}

fn reduce_bucket(entries: &[BucketEntry], tolerance: &Tolerance) -> Vec<Representative> {
    let mut ordered: Vec<&BucketEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| Reverse(e.source.rank()));

    let mut kept: Vec<Representative> = Vec::new();
    for entry in ordered {
        match kept.iter_mut().find(|rep| rep.matches(entry, tolerance)) {
            Some(rep) => rep.absorb(entry),
            None => kept.push(Representative::found(entry)),
        }
    }
    kept
}

/// Merge under the default tolerance policy.
pub fn merge_items(items_by_source: &ItemsBySource) -> Vec<MergedItem> {
    merge_items_with(items_by_source, &Tolerance::default())
}

/// Merge under an explicit tolerance policy.
///
/// Output is grouped by bucket in first-encounter order, representatives in
/// the order they were founded.
pub fn merge_items_with(items_by_source: &ItemsBySource, tolerance: &Tolerance) -> Vec<MergedItem> {
    let buckets = bucketize(items_by_source);

    let mut merged = Vec::with_capacity(items_by_source.item_count());
    let mut conflicts = 0usize;
    for (key, entries) in &buckets {
        let kept = reduce_bucket(entries, tolerance);
        let conflict = kept.len() > 1;
        if conflict {
            conflicts += 1;
            debug!(key = %key, representatives = kept.len(), "bucket did not collapse");
        }
        merged.extend(kept.into_iter().map(|rep| derived::finish(rep, conflict)));
    }

    info!(
        items = items_by_source.item_count(),
        buckets = buckets.len(),
        merged = merged.len(),
        conflicts,
        "merged guidance"
    );
    merged
}
