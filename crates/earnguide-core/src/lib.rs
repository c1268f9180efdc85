pub mod candidate;
mod error;
pub mod key;
pub mod metric;
pub mod period;
pub mod schema;
pub mod source;
pub mod tolerance;
pub mod units;

pub use candidate::{GuidanceCandidate, ItemsBySource, MergedItem, Note, StructuredDocument};
pub use error::GuidanceError;
pub use key::CanonicalKey;
pub use metric::{Metric, canonicalize_metric};
pub use period::{Period, PeriodType, canonicalize_period, canonicalize_period_with};
pub use schema::guidance;
pub use source::Source;
pub use tolerance::{Tolerance, close_enough};
pub use units::Unit;
