//! Reporting-period canonicalisation.
//!
//! Turns free text like "Q1 FY2024", "Q2 24" or "full year 2025" into a
//! `(period_type, fiscal_year, quarter)` triple.
//!
//! # Rules
//!
//! 1. Fiscal year comes from "fy" or "full year" followed by 2–4 digits; when
//!    that is absent, from the digits trailing a quarter token ("Q2 24",
//!    "Q3 FY25"). Two-digit years are prefixed with "20".
//! 2. Quarter is the first "q1".."q4" token, recorded uppercase.
//! 3. Period type defaults to quarter. Without a quarter token, either the
//!    literal phrase "full year" or a detected fiscal year makes it full year.
//!    A quarter token always wins over "full year" wording.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Recognised period classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PeriodType {
    #[serde(rename = "quarter")]
    Quarter,
    #[serde(rename = "full year")]
    FullYear,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quarter => "quarter",
            Self::FullYear => "full year",
        }
    }

    /// Lenient parse of a caller-supplied classification.
    ///
    /// Only the two canonical spellings are recognised (case and surrounding
    /// whitespace ignored); anything else is treated as absent.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "quarter" => Some(Self::Quarter),
            "full year" => Some(Self::FullYear),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed period.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period {
    pub period_type: PeriodType,
    pub fiscal_year: Option<String>,
    pub quarter: Option<String>,
}

fn fiscal_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:fy\s*|full\s*year\s*)(\d{2,4})").expect("fiscal year regex"))
}

fn quarter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"q([1-4])(?:\s*(?:fy\s*)?(\d{2,4}))?").expect("quarter regex"))
}

fn expand_year(digits: &str) -> String {
    if digits.len() == 2 {
        format!("20{digits}")
    } else {
        digits.to_string()
    }
}

/// Canonicalise a free-text period description. Never fails.
pub fn canonicalize_period(text: &str) -> Period {
    let l = text.trim().to_lowercase();

    let mut fiscal_year = fiscal_year_re()
        .captures(&l)
        .map(|caps| expand_year(&caps[1]));

    let mut quarter = None;
    if let Some(caps) = quarter_re().captures(&l) {
        quarter = Some(format!("Q{}", &caps[1]));
        if fiscal_year.is_none()
            && let Some(year) = caps.get(2)
        {
            fiscal_year = Some(expand_year(year.as_str()));
        }
    }

    let period_type = if quarter.is_none() && (l.contains("full year") || fiscal_year.is_some()) {
        PeriodType::FullYear
    } else {
        PeriodType::Quarter
    };

    Period {
        period_type,
        fiscal_year,
        quarter,
    }
}

/// Canonicalise a period, letting a recognised explicit classification
/// override the derived period type. Year and quarter always come from the text.
pub fn canonicalize_period_with(text: &str, explicit: Option<&str>) -> Period {
    let mut period = canonicalize_period(text);
    if let Some(pt) = explicit.and_then(PeriodType::parse) {
        period.period_type = pt;
    }
    period
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str, pt: PeriodType, fy: Option<&str>, q: Option<&str>) {
        let p = canonicalize_period(text);
        assert_eq!(p.period_type, pt, "period type for {text:?}");
        assert_eq!(p.fiscal_year.as_deref(), fy, "fiscal year for {text:?}");
        assert_eq!(p.quarter.as_deref(), q, "quarter for {text:?}");
    }

    #[test]
    fn quarter_with_fiscal_year() {
        check("Q1 FY2024", PeriodType::Quarter, Some("2024"), Some("Q1"));
    }

    #[test]
    fn quarter_with_short_year() {
        check("Q2 24", PeriodType::Quarter, Some("2024"), Some("Q2"));
        check("q3 fy25", PeriodType::Quarter, Some("2025"), Some("Q3"));
    }

    #[test]
    fn full_year_phrase_with_year() {
        check("full year 2025", PeriodType::FullYear, Some("2025"), None);
    }

    #[test]
    fn fiscal_year_alone_is_full_year() {
        check("FY2024", PeriodType::FullYear, Some("2024"), None);
        check("fy 23", PeriodType::FullYear, Some("2023"), None);
    }

    #[test]
    fn full_year_phrase_without_year() {
        check("the full year", PeriodType::FullYear, None, None);
    }

    #[test]
    fn quarter_beats_full_year_wording() {
        let p = canonicalize_period("Q4 of the full year 2024");
        assert_eq!(p.period_type, PeriodType::Quarter);
        assert_eq!(p.quarter.as_deref(), Some("Q4"));
        assert_eq!(p.fiscal_year.as_deref(), Some("2024"));
    }

    #[test]
    fn unrecognised_defaults_to_quarter() {
        check("next twelve months", PeriodType::Quarter, None, None);
        check("", PeriodType::Quarter, None, None);
    }

    #[test]
    fn explicit_type_overrides_but_keeps_year() {
        let p = canonicalize_period_with("FY2024", Some("Quarter"));
        assert_eq!(p.period_type, PeriodType::Quarter);
        assert_eq!(p.fiscal_year.as_deref(), Some("2024"));

        let p = canonicalize_period_with("Q1 FY2024", Some("full year"));
        assert_eq!(p.period_type, PeriodType::FullYear);
        assert_eq!(p.quarter.as_deref(), Some("Q1"));
    }

    #[test]
    fn unrecognised_explicit_type_is_ignored() {
        let p = canonicalize_period_with("FY2024", Some("annual"));
        assert_eq!(p.period_type, PeriodType::FullYear);
    }

    #[test]
    fn period_type_parse() {
        assert_eq!(PeriodType::parse(" Full Year "), Some(PeriodType::FullYear));
        assert_eq!(PeriodType::parse("quarter"), Some(PeriodType::Quarter));
        assert_eq!(PeriodType::parse("fy"), None);
    }

    #[test]
    fn period_type_serde_uses_spaced_name() {
        let json = serde_json::to_string(&PeriodType::FullYear).unwrap();
        assert_eq!(json, "\"full year\"");
    }
}
