//! Canonical keys: the "slot" a guidance statement occupies.
//!
//! Two items with equal keys are merge candidates. The string form
//! `metric|period_type|fiscal_year|quarter` is what resolution stores key on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metric::canonicalize_metric;
use crate::period::{PeriodType, canonicalize_period_with};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalKey {
    pub metric: String,
    pub period_type: PeriodType,
    pub fiscal_year: Option<String>,
    pub quarter: Option<String>,
}

impl CanonicalKey {
    /// Derive the key for a statement.
    ///
    /// `explicit_period_type` overrides the derived period type when it is one of
    /// the two recognised spellings.
    pub fn derive(metric: &str, period: &str, explicit_period_type: Option<&str>) -> Self {
        let p = canonicalize_period_with(period, explicit_period_type);
        Self {
            metric: canonicalize_metric(metric),
            period_type: p.period_type,
            fiscal_year: p.fiscal_year,
            quarter: p.quarter,
        }
    }

    /// Pipe-delimited key used by resolution stores.
    ///
    /// "revenue", full year, 2025, no quarter → `revenue|full year|2025|`
    pub fn resolution_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.metric.trim().to_lowercase(),
            self.period_type.as_str(),
            self.fiscal_year.as_deref().unwrap_or(""),
            self.quarter.as_deref().unwrap_or(""),
        )
    }

    /// Human-readable label for conflict review.
    pub fn label(&self) -> String {
        let per = match (&self.fiscal_year, self.period_type) {
            (Some(fy), PeriodType::Quarter) => {
                format!("{} FY{}", self.quarter.as_deref().unwrap_or(""), fy)
                    .trim()
                    .to_string()
            }
            (Some(fy), PeriodType::FullYear) => format!("Full Year {fy}"),
            (None, _) => "Period".to_string(),
        };
        format!("{} — {} ({})", self.metric, per, self.period_type)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolution_key())
    }
}
