//! Compiled text patterns shared by the prefilter and value normaliser.

use std::sync::OnceLock;

use regex::Regex;

/// Words and period tokens that mark a paragraph as guidance-relevant.
pub(crate) fn guidance_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(guidance|outlook|forecast|expect|expects|we\s+expect|we\s+forecast|full\s+year|FY\d{2,4}|Q[1-4]\s*(?:FY)?\d{2,4}|quarterly\s+outlook)",
        )
        .expect("guidance regex must compile")
    })
}

/// A number with optional currency prefix and magnitude/unit suffix.
pub(crate) fn number_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\$?\s?\d[\d,]*(?:\.\d+)?\s*(?:billion|bn|million|m|percent|%|bps|basis points|eps|dollars)?",
        )
        .expect("number span regex must compile")
    })
}

/// Period mentions such as "Q1 FY24", "FY 2025", "full year 2024".
pub(crate) fn period_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(Q[1-4]\s*(?:FY)?\d{2,4}|FY\s?\d{2,4}|FY\d{2}|full\s+year\s+\d{4}|full\s+year)")
            .expect("period regex must compile")
    })
}

/// One or more blank lines (whitespace-only lines count as blank).
pub(crate) fn paragraph_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").expect("paragraph regex must compile"))
}

pub(crate) fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex must compile"))
}

/// Separators between the two ends of a range: "to", hyphen, en/em dash, tilde.
pub(crate) fn range_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*(?:to|-|–|—|~)\s*").expect("range regex must compile"))
}

/// A standalone "m" magnitude suffix.
pub(crate) fn million_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bm\b").expect("million suffix regex must compile"))
}

/// English long-form date: "March 5, 2024".
pub(crate) fn long_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(January|February|March|April|May|June|July|August|September|October|November|December)\s+([12]?\d|3[01]),\s+(20\d{2})",
        )
        .expect("date regex must compile")
    })
}

/// Legal boilerplate that is never guidance, even when it mentions numbers or outlooks.
pub(crate) const BOILERPLATE_PHRASES: &[&str] = &["safe harbor", "forward-looking statements"];
