//! Merge layer: canonical-key bucketing, tolerance dedup, derived fields, conflict resolution.

mod derived;
mod engine;
mod input;
mod resolve;

pub use derived::{average, check_invariants};
pub use engine::{BucketEntry, bucketize, merge_items, merge_items_with};
pub use input::collect_by_source;
pub use resolve::{
    Resolution, conflict_groups, finalize, group_by_key, preselect_choices, preselect_index,
};
