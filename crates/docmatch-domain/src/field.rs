//! Field values and per-field extraction results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed field value
///
/// Serialized untagged: text as a string, numbers as numbers, dates as
/// `YYYY-MM-DD` strings, lists as arrays and `Null` as JSON null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Absent value (empty date or number)
    Null,
    /// Numeric value
    Number(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Free text or a selected option
    Text(String),
    /// List of text items
    List(Vec<String>),
}

impl FieldValue {
    /// Whether the value carries no information
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Number(_) | FieldValue::Date(_) => false,
        }
    }

    /// Text payload, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Where a field value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// A key/value pair whose key matches the field label
    DirectMatch,
    /// A type-specific regular expression over the whole text
    PatternMatch,
    /// The line carrying the field label, or the line after it
    ContextMatch,
    /// A detected entity of a compatible category
    AiInference,
    /// Nothing matched; type default
    Default,
}

impl FieldSource {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldSource::DirectMatch => "direct_match",
            FieldSource::PatternMatch => "pattern_match",
            FieldSource::ContextMatch => "context_match",
            FieldSource::AiInference => "ai_inference",
            FieldSource::Default => "default",
        }
    }
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved value of one template field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResult {
    /// Id of the template field
    pub field_id: String,
    /// Coerced value; never absent
    pub value: FieldValue,
    /// Confidence [0.0, 1.0]
    pub confidence: f64,
    /// Strategy that produced the value
    pub source: FieldSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_values() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(serde_json::to_string(&FieldValue::Date(date)).unwrap(), "\"2025-02-01\"");
        assert_eq!(serde_json::to_string(&FieldValue::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&FieldValue::Number(3.0)).unwrap(), "3.0");
        assert_eq!(
            serde_json::to_string(&FieldValue::List(vec!["a".into()])).unwrap(),
            "[\"a\"]"
        );
    }

    #[test]
    fn test_deserialize_date_before_text() {
        let value: FieldValue = serde_json::from_str("\"2025-02-01\"").unwrap();
        assert!(matches!(value, FieldValue::Date(_)));
        let value: FieldValue = serde_json::from_str("\"Pune\"").unwrap();
        assert_eq!(value, FieldValue::Text("Pune".into()));
    }

    #[test]
    fn test_is_empty() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::Text("  ".into()).is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&FieldSource::DirectMatch).unwrap(),
            "\"direct_match\""
        );
        assert_eq!(FieldSource::AiInference.to_string(), "ai_inference");
    }
}
