//! Signal normalization: any input becomes a text blob and a line view

use crate::types::{DocumentInput, NormalizedSignals};
use docmatch_domain::confidence;
use docmatch_domain::{Diagnostic, ExtractedDocument};
use serde_json::Value;
use tracing::{debug, warn};

/// Normalize any input into flat signals
///
/// Never fails: malformed raw input is read as plain text and flagged with an
/// `InputMalformed` diagnostic.
pub fn normalize(input: &DocumentInput) -> NormalizedSignals {
    match input {
        DocumentInput::Document(doc) => normalize_document(doc),
        DocumentInput::Structured(value) => normalize_structured(value),
        DocumentInput::Raw(raw) => normalize_raw(raw),
    }
}

fn normalize_document(doc: &ExtractedDocument) -> NormalizedSignals {
    let text = if doc.raw_text.trim().is_empty() && !doc.lines.is_empty() {
        doc.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        doc.raw_text.clone()
    };

    let lines: Vec<String> = if doc.lines.is_empty() {
        text.lines().map(str::to_string).collect()
    } else {
        doc.lines.iter().map(|l| l.text.clone()).collect()
    };

    debug!(
        "Normalized document: {} chars, {} lines, {} key/value pairs",
        text.len(),
        lines.len(),
        doc.key_value_pairs.len()
    );

    NormalizedSignals {
        text,
        lines,
        lines_meaningful: true,
        field_names: doc.key_value_pairs.iter().map(|kv| kv.key.clone()).collect(),
        entities: doc.entities.clone(),
        key_value_pairs: doc.key_value_pairs.clone(),
        base_confidence: doc.confidence.map(confidence::clamp),
        diagnostics: Vec::new(),
    }
}

fn normalize_structured(value: &Value) -> NormalizedSignals {
    let mut tokens = Vec::new();
    let mut field_names = Vec::new();
    walk(value, &mut tokens, &mut field_names);

    NormalizedSignals {
        text: tokens.join(" "),
        lines: Vec::new(),
        lines_meaningful: false,
        field_names,
        ..Default::default()
    }
}

fn normalize_raw(raw: &str) -> NormalizedSignals {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            if value.get("rawText").is_some() {
                match serde_json::from_value::<ExtractedDocument>(value.clone()) {
                    Ok(doc) => return normalize_document(&doc),
                    Err(e) => {
                        warn!("Document-shaped input did not parse, flattening instead: {}", e);
                        let mut signals = normalize_structured(&value);
                        signals.diagnostics.push(Diagnostic::InputMalformed {
                            reason: e.to_string(),
                        });
                        return signals;
                    }
                }
            }
            normalize_structured(&value)
        }
        Err(e) => {
            if !raw.trim().is_empty() {
                debug!("Raw input is not JSON, reading as plain text: {}", e);
            }
            let mut signals = normalize_document(&ExtractedDocument::from_text(raw));
            if !raw.trim().is_empty() {
                signals.diagnostics.push(Diagnostic::InputMalformed {
                    reason: format!("not structured data, read as plain text ({})", e),
                });
            }
            signals
        }
    }
}

/// Flatten a nested value into a single space-joined token string
///
/// Every key and every scalar is emitted; nulls are skipped. Object keys come
/// out in sorted order, array elements in their original order.
pub fn flatten_value(value: &Value) -> String {
    let mut tokens = Vec::new();
    let mut keys = Vec::new();
    walk(value, &mut tokens, &mut keys);
    tokens.join(" ")
}

fn walk(value: &Value, tokens: &mut Vec<String>, keys: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => tokens.push(b.to_string()),
        Value::Number(n) => tokens.push(n.to_string()),
        Value::String(s) => {
            if !s.is_empty() {
                tokens.push(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, tokens, keys);
            }
        }
        Value::Object(map) => {
            for (key, child) in map {
                tokens.push(key.clone());
                keys.push(key.clone());
                walk(child, tokens, keys);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmatch_domain::{KvPair, LineSignal};
    use serde_json::json;

    #[test]
    fn test_flatten_nested_structure() {
        let value = json!({
            "applicant": {"name": "Asha Rao", "age": 41},
            "dates": ["01-02-2025", null, true]
        });
        let text = flatten_value(&value);
        // keys sorted, array order kept
        assert_eq!(text, "applicant age 41 name Asha Rao dates 01-02-2025 true");
    }

    #[test]
    fn test_empty_structure_is_empty_text() {
        let signals = normalize(&DocumentInput::Structured(json!({})));
        assert_eq!(signals.text, "");
        assert!(signals.field_names.is_empty());
    }

    #[test]
    fn test_structured_lines_not_meaningful() {
        let signals = normalize(&DocumentInput::Structured(json!({"leaveType": "earned"})));
        assert!(!signals.lines_meaningful);
        assert_eq!(signals.field_names, vec!["leaveType".to_string()]);
    }

    #[test]
    fn test_document_lines_from_text() {
        let doc = ExtractedDocument::from_text("Name: Asha Rao\nStation: Pune")
            .with_key_value_pairs(vec![KvPair::new("Name", "Asha Rao", 0.9)]);
        let signals = normalize(&DocumentInput::Document(doc));
        assert!(signals.lines_meaningful);
        assert_eq!(signals.lines.len(), 2);
        assert_eq!(signals.field_names, vec!["Name".to_string()]);
    }

    #[test]
    fn test_document_text_from_lines_when_blank() {
        let doc = ExtractedDocument {
            lines: vec![
                LineSignal { text: "first".into(), confidence: Some(0.9) },
                LineSignal { text: "second".into(), confidence: None },
            ],
            ..Default::default()
        };
        let signals = normalize(&DocumentInput::Document(doc));
        assert_eq!(signals.text, "first\nsecond");
    }

    #[test]
    fn test_raw_plain_text_flagged() {
        let signals = normalize(&DocumentInput::Raw("Application for earned leave".into()));
        assert_eq!(signals.text, "Application for earned leave");
        assert!(matches!(
            signals.diagnostics.as_slice(),
            [Diagnostic::InputMalformed { .. }]
        ));
    }

    #[test]
    fn test_raw_json_document() {
        let signals = normalize(&DocumentInput::Raw(
            r#"{"rawText": "Sick leave\nfrom 01-02-2025", "confidence": 1.7}"#.into(),
        ));
        assert_eq!(signals.lines.len(), 2);
        assert_eq!(signals.base_confidence, Some(1.0));
        assert!(signals.diagnostics.is_empty());
    }

    #[test]
    fn test_raw_json_structure() {
        let signals = normalize(&DocumentInput::Raw(r#"{"reason": "family function"}"#.into()));
        assert_eq!(signals.text, "reason family function");
        assert!(!signals.lines_meaningful);
    }

    #[test]
    fn test_raw_empty_input() {
        let signals = normalize(&DocumentInput::Raw("   ".into()));
        assert!(signals.text.trim().is_empty());
        assert!(signals.diagnostics.is_empty());
    }
}
