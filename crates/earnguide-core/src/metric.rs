//! Metric-name canonicalisation.
//!
//! Free-text metric labels ("Total net sales", "diluted EPS") are mapped onto a
//! small canonical vocabulary by substring containment against a fixed alias
//! table. The table is scanned in [`Metric::ALL`] order and the first canonical
//! metric with a matching alias wins, so "annual recurring revenue" lands on
//! `revenue`, not `arr`.
//!
//! Containment matching can false-positive on short aliases (`arr` inside
//! "carry", `eps` inside "steps"). New aliases should be checked against that.

use std::fmt;

/// Canonical metric vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Revenue,
    Eps,
    GrossMargin,
    OperatingMargin,
    OperatingIncome,
    Capex,
    FreeCashFlow,
    Arr,
}

impl Metric {
    /// Priority order for alias scanning.
    pub const ALL: [Metric; 8] = [
        Self::Revenue,
        Self::Eps,
        Self::GrossMargin,
        Self::OperatingMargin,
        Self::OperatingIncome,
        Self::Capex,
        Self::FreeCashFlow,
        Self::Arr,
    ];

    /// Canonical key string used in bucketing and resolution keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Eps => "eps",
            Self::GrossMargin => "gross margin",
            Self::OperatingMargin => "operating margin",
            Self::OperatingIncome => "op income",
            Self::Capex => "capex",
            Self::FreeCashFlow => "fcf",
            Self::Arr => "arr",
        }
    }

    /// Lowercase alias substrings that identify this metric.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Revenue => &["revenue", "sales", "top line"],
            Self::Eps => &["eps", "earnings per share"],
            Self::GrossMargin => &["gross margin", "gross profit margin", "gpm"],
            Self::OperatingMargin => &["operating margin", "op margin"],
            Self::OperatingIncome => &["operating income", "op income"],
            Self::Capex => &["capex", "capital expenditures"],
            Self::FreeCashFlow => &["free cash flow", "fcf"],
            Self::Arr => &["annual recurring revenue", "arr"],
        }
    }

    /// First metric (in priority order) whose aliases occur in `text`.
    pub fn detect(text: &str) -> Option<Metric> {
        let t = text.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.aliases().iter().any(|alias| t.contains(alias)))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonicalise a metric label.
///
/// Unrecognised labels pass through lowercased and trimmed, so they still
/// bucket with identically-worded statements. Empty input yields `""`.
pub fn canonicalize_metric(text: &str) -> String {
    let t = text.trim().to_lowercase();
    if t.is_empty() {
        return String::new();
    }
    match Metric::detect(&t) {
        Some(m) => m.as_str().to_string(),
        None => t,
    }
}
