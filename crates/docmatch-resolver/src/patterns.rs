//! Regular expressions shared by the cascade, the coercions and the local analyzer
//!
//! The `*_TOKEN` patterns find candidate values in free text. The `*_PARTS`
//! patterns capture the components a parser needs.

use regex::Regex;
use std::sync::LazyLock;

/// Numeric date such as `01-02-2025` or `1/2/25`
pub(crate) static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b").expect("valid date regex")
});

/// Textual date such as `5 March 2025`
pub(crate) static TEXTUAL_DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}\s+\w+\s+\d{4}\b").expect("valid textual date regex")
});

/// Run of digits
pub(crate) static INTEGER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid integer regex"));

/// Two capitalized words, read as a person's name
pub(crate) static NAME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b").expect("valid name regex")
});

/// Day, month and year of a numeric date; `.` is accepted as a separator
pub(crate) static NUMERIC_DATE_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[-/.](\d{1,2})[-/.](\d{2,4})\b").expect("valid numeric date regex")
});

/// Year, month and day of an ISO date
pub(crate) static ISO_DATE_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid iso date regex")
});

/// Day, month name and year of a textual date
pub(crate) static TEXTUAL_DATE_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)?\s+([A-Za-z]+),?\s+(\d{4})\b")
        .expect("valid textual date regex")
});

/// Signed decimal number
pub(crate) static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert!(DATE_TOKEN.is_match("on 01-02-2025"));
        assert!(!DATE_TOKEN.is_match("on 2025-02-01"));
        assert!(TEXTUAL_DATE_TOKEN.is_match("from 5 March 2025"));
        assert_eq!(NAME_TOKEN.find("by Asha Rao today").map(|m| m.as_str()), Some("Asha Rao"));
    }

    #[test]
    fn test_date_parts() {
        let caps = NUMERIC_DATE_PARTS.captures("1.2.25").unwrap();
        assert_eq!((&caps[1], &caps[2], &caps[3]), ("1", "2", "25"));
        assert!(ISO_DATE_PARTS.is_match("2025-02-01"));
        assert!(TEXTUAL_DATE_PARTS.is_match("5th March, 2025"));
    }
}
