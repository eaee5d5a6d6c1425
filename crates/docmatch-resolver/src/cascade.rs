//! Field extraction cascade
//!
//! Each field is offered to the strategies in priority order (direct match,
//! entity match, pattern match, context match). The highest-confidence hit is
//! kept; on equal confidence the earlier strategy wins. A field nothing
//! matches gets its type default with confidence 0.

use crate::coerce::{coerce, default_value};
use crate::patterns::{DATE_TOKEN, INTEGER_TOKEN, NAME_TOKEN, TEXTUAL_DATE_TOKEN};
use docmatch_domain::document::categories;
use docmatch_domain::{
    confidence, Entity, FieldResult, FieldSource, FieldSpec, FieldType, FieldValue, KvPair,
    TemplateDefinition,
};
use regex::Regex;
use tracing::debug;

/// Confidence of a numeric date found in the text
pub const NUMERIC_DATE_CONFIDENCE: f64 = 0.9;
/// Confidence of a textual date such as `5 March 2025`
pub const TEXTUAL_DATE_CONFIDENCE: f64 = 0.8;
/// Confidence of a bare number found in the text
pub const NUMBER_CONFIDENCE: f64 = 0.7;
/// Confidence of a capitalized name found in the text
pub const NAME_CONFIDENCE: f64 = 0.7;
/// Confidence of a value on the label's own line
pub const SAME_LINE_CONFIDENCE: f64 = 0.7;
/// Confidence of a value on the line after the label
pub const NEXT_LINE_CONFIDENCE: f64 = 0.6;

/// Longest prefix before a colon that still reads as a label
const MAX_LABEL_PREFIX: usize = 40;

/// Signals available to the cascade
#[derive(Debug, Clone, Copy)]
pub struct CascadeInput<'a> {
    /// Flattened text, case preserved
    pub text: &'a str,
    /// Line-indexed view of the text
    pub lines: &'a [String],
    /// Whether `lines` reflect real line breaks
    pub lines_meaningful: bool,
    /// Document entities followed by analyzer entities
    pub entities: &'a [Entity],
    /// Key/value pairs supplied with the input
    pub key_value_pairs: &'a [KvPair],
}

#[derive(Debug)]
struct Candidate {
    value: FieldValue,
    confidence: f64,
    source: FieldSource,
}

/// Extract one result per template field, in schema order
pub fn extract_fields(template: &TemplateDefinition, input: &CascadeInput<'_>) -> Vec<FieldResult> {
    template
        .fields
        .iter()
        .map(|field| extract_field(field, input))
        .collect()
}

fn extract_field(field: &FieldSpec, input: &CascadeInput<'_>) -> FieldResult {
    let strategies = [
        direct_match(field, input.key_value_pairs),
        entity_match(field, input.entities),
        pattern_match(field, input.text),
        if input.lines_meaningful {
            context_match(field, input.lines)
        } else {
            None
        },
    ];

    let mut best: Option<Candidate> = None;
    for candidate in strategies.into_iter().flatten() {
        let value = coerce(candidate.value, field);
        if value.is_empty() {
            continue;
        }
        let candidate = Candidate {
            value,
            confidence: confidence::clamp(candidate.confidence),
            source: candidate.source,
        };
        if best.as_ref().map_or(true, |b| candidate.confidence > b.confidence) {
            best = Some(candidate);
        }
    }

    match best {
        Some(found) => {
            debug!(
                "Field '{}' resolved by {} ({:.2})",
                field.id, found.source, found.confidence
            );
            FieldResult {
                field_id: field.id.clone(),
                value: found.value,
                confidence: found.confidence,
                source: found.source,
            }
        }
        None => {
            debug!("Field '{}' not found, using default", field.id);
            FieldResult {
                field_id: field.id.clone(),
                value: default_value(field),
                confidence: 0.0,
                source: FieldSource::Default,
            }
        }
    }
}

fn direct_match(field: &FieldSpec, pairs: &[KvPair]) -> Option<Candidate> {
    let label = field.label.trim().to_lowercase();
    if label.is_empty() {
        return None;
    }
    pairs
        .iter()
        .filter(|pair| {
            let key = pair.key.trim().to_lowercase();
            !key.is_empty() && (key.contains(&label) || label.contains(&key))
        })
        .filter(|pair| !pair.value.trim().is_empty())
        .fold(None::<&KvPair>, |best, pair| match best {
            Some(b) if b.confidence >= pair.confidence => Some(b),
            _ => Some(pair),
        })
        .map(|pair| Candidate {
            value: FieldValue::Text(pair.value.trim().to_string()),
            confidence: pair.confidence,
            source: FieldSource::DirectMatch,
        })
}

/// Entity category implied by a field label
fn entity_category(label: &str) -> Option<&'static str> {
    let label = label.to_lowercase();
    if label.contains("name") {
        Some(categories::PERSON)
    } else if label.contains("date") {
        Some(categories::DATE_TIME)
    } else if label.contains("organization") || label.contains("station") {
        Some(categories::ORGANIZATION)
    } else if label.contains("location") || label.contains("address") {
        Some(categories::LOCATION)
    } else {
        None
    }
}

fn entity_match(field: &FieldSpec, entities: &[Entity]) -> Option<Candidate> {
    let category = entity_category(&field.label)?;
    entities
        .iter()
        .filter(|e| e.category.eq_ignore_ascii_case(category) && !e.text.trim().is_empty())
        .fold(None::<&Entity>, |best, entity| match best {
            Some(b) if b.confidence >= entity.confidence => Some(b),
            _ => Some(entity),
        })
        .map(|entity| Candidate {
            value: FieldValue::Text(entity.text.trim().to_string()),
            confidence: entity.confidence,
            source: FieldSource::AiInference,
        })
}

fn pattern_match(field: &FieldSpec, text: &str) -> Option<Candidate> {
    let label = field.label.to_lowercase();
    // first hit that survives coercion to the field's type
    let found = |re: &Regex, confidence: f64| {
        re.find_iter(text).find_map(|m| {
            let value = coerce(FieldValue::Text(m.as_str().to_string()), field);
            (!value.is_empty()).then_some(Candidate {
                value,
                confidence,
                source: FieldSource::PatternMatch,
            })
        })
    };

    if field.field_type == FieldType::Date || label.contains("date") {
        found(&DATE_TOKEN, NUMERIC_DATE_CONFIDENCE)
            .or_else(|| found(&TEXTUAL_DATE_TOKEN, TEXTUAL_DATE_CONFIDENCE))
    } else if field.field_type == FieldType::Number {
        found(&INTEGER_TOKEN, NUMBER_CONFIDENCE)
    } else if label.contains("name") {
        found(&NAME_TOKEN, NAME_CONFIDENCE)
    } else {
        None
    }
}

fn context_match(field: &FieldSpec, lines: &[String]) -> Option<Candidate> {
    let label = field.label.trim().to_lowercase();
    if label.is_empty() {
        return None;
    }
    let (index, line) = lines
        .iter()
        .enumerate()
        .find(|(_, line)| line.to_lowercase().contains(&label))?;

    if let Some(value) = value_after_label(line, &label) {
        return Some(Candidate {
            value: FieldValue::Text(value),
            confidence: SAME_LINE_CONFIDENCE,
            source: FieldSource::ContextMatch,
        });
    }

    let next = lines[index + 1..].iter().find(|l| !l.trim().is_empty())?;
    if looks_like_label(next) {
        return None;
    }
    Some(Candidate {
        value: FieldValue::Text(next.trim().to_string()),
        confidence: NEXT_LINE_CONFIDENCE,
        source: FieldSource::ContextMatch,
    })
}

/// Text after the first colon that follows the label on its line
fn value_after_label(line: &str, label: &str) -> Option<String> {
    let end = label_end(line, label)?;
    let tail = &line[end..];
    let colon = tail.find(':')?;
    let value = tail[colon + 1..].trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Byte offset in `line` just past the first case-insensitive occurrence of
/// the lower-case `label`
fn label_end(line: &str, label: &str) -> Option<usize> {
    let width = label.chars().count();
    line.char_indices().find_map(|(start, _)| {
        let rest = &line[start..];
        let len = rest.char_indices().nth(width).map_or(rest.len(), |(i, _)| i);
        (rest[..len].to_lowercase() == label).then_some(start + len)
    })
}

fn looks_like_label(line: &str) -> bool {
    let line = line.trim();
    if line.ends_with(':') {
        return true;
    }
    match line.split_once(':') {
        Some((prefix, _)) => {
            let prefix = prefix.trim();
            !prefix.is_empty()
                && prefix.chars().count() <= MAX_LABEL_PREFIX
                && !prefix.chars().any(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
