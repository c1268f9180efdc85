//! Filing-date sniffing from the head of a document.

use chrono::NaiveDate;

use crate::patterns::long_date_re;

/// How far into a document to look for the filing date.
pub const FILING_DATE_SCAN_CHARS: usize = 2000;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// First "Month D, YYYY" date in the document head, if it is a real calendar date.
pub fn filing_date_from_text(text: &str) -> Option<NaiveDate> {
    let head: String = text.chars().take(FILING_DATE_SCAN_CHARS).collect();
    let caps = long_date_re().captures(&head)?;

    let month = MONTHS.iter().position(|m| *m == &caps[1])? as u32 + 1;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// [`filing_date_from_text`] rendered as `YYYY-MM-DD`.
pub fn filing_date_iso(text: &str) -> Option<String> {
    filing_date_from_text(text).map(|d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_long_form_date() {
        let text = "CUPERTINO, California, February 1, 2024 — Apple today announced";
        assert_eq!(
            filing_date_from_text(text),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(filing_date_iso(text).as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn first_date_wins() {
        let text = "March 5, 2024. Previously reported on January 30, 2024.";
        assert_eq!(filing_date_iso(text).as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn impossible_date_is_none() {
        assert_eq!(filing_date_from_text("February 30, 2024"), None);
        assert_eq!(filing_date_from_text("June 0, 2024"), None);
    }

    #[test]
    fn only_document_head_is_scanned() {
        let text = format!("{}March 5, 2024", " ".repeat(FILING_DATE_SCAN_CHARS));
        assert_eq!(filing_date_from_text(&text), None);
    }

    #[test]
    fn no_date() {
        assert_eq!(filing_date_from_text("Q1 FY2024 results"), None);
    }
}
