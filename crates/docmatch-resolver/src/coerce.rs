//! Type coercion of extracted values
//!
//! Coercion is idempotent: a value already of the field's type comes back
//! unchanged. Unparsable numbers become `0`, unparsable dates become `Null`.

use crate::patterns::{DECIMAL, ISO_DATE_PARTS, NUMERIC_DATE_PARTS, TEXTUAL_DATE_PARTS};
use chrono::NaiveDate;
use docmatch_domain::{FieldSpec, FieldType, FieldValue};

/// Empty value for a field type
pub fn default_value(spec: &FieldSpec) -> FieldValue {
    match spec.field_type {
        FieldType::Text | FieldType::Textarea => FieldValue::Text(String::new()),
        FieldType::Number | FieldType::Date => FieldValue::Null,
        FieldType::Select => FieldValue::Text(
            spec.options
                .as_ref()
                .and_then(|o| o.first().cloned())
                .unwrap_or_default(),
        ),
        FieldType::List => FieldValue::List(Vec::new()),
    }
}

/// Convert a value to the field's type
pub fn coerce(value: FieldValue, spec: &FieldSpec) -> FieldValue {
    match spec.field_type {
        FieldType::Text | FieldType::Textarea => FieldValue::Text(as_plain_text(&value)),
        FieldType::Number => match value {
            FieldValue::Number(n) if n.is_finite() => FieldValue::Number(n),
            FieldValue::Number(_) => FieldValue::Number(0.0),
            FieldValue::Null => FieldValue::Null,
            other => {
                let text = as_plain_text(&other);
                if text.is_empty() {
                    FieldValue::Null
                } else {
                    FieldValue::Number(parse_number(&text))
                }
            }
        },
        FieldType::Date => match value {
            FieldValue::Date(d) => FieldValue::Date(d),
            FieldValue::Null | FieldValue::Number(_) => FieldValue::Null,
            other => parse_date(&as_plain_text(&other))
                .map(FieldValue::Date)
                .unwrap_or(FieldValue::Null),
        },
        FieldType::Select => match value {
            FieldValue::Null => default_value(spec),
            other => FieldValue::Text(snap_to_option(&as_plain_text(&other), spec)),
        },
        FieldType::List => match value {
            FieldValue::List(items) => FieldValue::List(clean_items(items)),
            FieldValue::Null => FieldValue::List(Vec::new()),
            FieldValue::Text(s) => FieldValue::List(split_list(&s)),
            other => FieldValue::List(clean_items(vec![other.to_string()])),
        },
    }
}

fn as_plain_text(value: &FieldValue) -> String {
    match value {
        FieldValue::List(items) => items
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string().trim().to_string(),
    }
}

fn snap_to_option(text: &str, spec: &FieldSpec) -> String {
    let options = match &spec.options {
        Some(options) if !options.is_empty() => options,
        _ => return text.to_string(),
    };
    let lower = text.to_lowercase();
    if let Some(exact) = options.iter().find(|o| o.trim().to_lowercase() == lower) {
        return exact.clone();
    }
    if lower.is_empty() {
        return text.to_string();
    }
    options
        .iter()
        .find(|o| {
            let option = o.trim().to_lowercase();
            !option.is_empty() && lower.contains(option.as_str())
        })
        .cloned()
        .unwrap_or_else(|| text.to_string())
}

fn split_list(text: &str) -> Vec<String> {
    text.split([',', ';', '\n'])
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parse a number out of free text, 0 when there is none
///
/// Thousands separators are ignored; the first numeric token wins when the
/// text is not a bare number.
pub fn parse_number(text: &str) -> f64 {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if let Ok(n) = cleaned.parse::<f64>() {
        if n.is_finite() {
            return n;
        }
    }
    DECIMAL
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Parse the first date found in free text
///
/// Numeric dates are read day-first (`01-02-2025` is 1 February 2025);
/// two-digit years are taken as 20xx. ISO dates and textual dates such as
/// `5 March 2025` are also accepted. The earliest date in the text wins.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let iso = ISO_DATE_PARTS.captures_iter(text).find_map(|caps| {
        let date = ymd(caps[1].parse().ok(), caps[2].parse().ok(), caps[3].parse().ok())?;
        Some((caps.get(0)?.start(), date))
    });
    let numeric = NUMERIC_DATE_PARTS.captures_iter(text).find_map(|caps| {
        let year_digits = &caps[3];
        let year = match (year_digits.len(), year_digits.parse::<i32>().ok()) {
            (2, Some(y)) => Some(y + 2000),
            (4, Some(y)) => Some(y),
            _ => None,
        };
        let date = ymd(year, caps[2].parse().ok(), caps[1].parse().ok())?;
        Some((caps.get(0)?.start(), date))
    });
    let textual = TEXTUAL_DATE_PARTS.captures_iter(text).find_map(|caps| {
        let date = ymd(caps[3].parse().ok(), month_number(&caps[2]), caps[1].parse().ok())?;
        Some((caps.get(0)?.start(), date))
    });

    [iso, numeric, textual]
        .into_iter()
        .flatten()
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, date)| date)
}

fn ymd(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year?, month?, day?)
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
