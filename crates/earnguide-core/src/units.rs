//! Unit canonicalisation into coarse buckets.
//!
//! No currency conversion and no scale inference happen here; "bn" and "million"
//! both land in [`Unit::Usd`]. Unrecognised text passes through lowercased so it
//! forms its own bucket, and absent units become the empty passthrough.

use std::fmt;

use serde::{Deserialize, Serialize};

const PERCENT_EXACT: &[&str] = &["percent", "%", "percentage", "pp"];
const EPS_CONTAINS: &str = "eps";
const USD_CONTAINS: &[&str] = &["usd", "$", "dollar", "bn", "billion", "m", "million"];

/// Canonical unit bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    Percent,
    Eps,
    Usd,
    /// Lowercased, trimmed text that matched no bucket. Empty when no unit was given.
    Other(String),
}

impl Unit {
    /// Map a free-text unit hint onto a bucket.
    ///
    /// Checked in order: exact percent spellings, then "eps" containment, then
    /// any dollar/scale marker by containment. The "m" marker is a plain
    /// containment test, so any word containing an "m" lands in `Usd`.
    pub fn canonicalize(units: Option<&str>) -> Self {
        let Some(raw) = units else {
            return Self::Other(String::new());
        };
        let u = raw.trim().to_lowercase();
        if PERCENT_EXACT.contains(&u.as_str()) {
            Self::Percent
        } else if u.contains(EPS_CONTAINS) {
            Self::Eps
        } else if USD_CONTAINS.iter().any(|marker| u.contains(marker)) {
            Self::Usd
        } else {
            Self::Other(u)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Percent => "percent",
            Self::Eps => "eps",
            Self::Usd => "usd",
            Self::Other(s) => s,
        }
    }

    /// True for the empty passthrough bucket.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Other(s) if s.is_empty())
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        Self::canonicalize(Some(&s))
    }
}

impl From<Unit> for String {
    fn from(u: Unit) -> Self {
        match u {
            Unit::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
