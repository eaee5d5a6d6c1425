//! Pattern and keyword scoring of templates
//!
//! Pure and deterministic. Every signal adds a fixed weight; the order in
//! which signals are found does not matter.

use docmatch_domain::{Entity, TemplateDefinition};
use std::collections::HashSet;

/// Weight of a template keyword found in the text
pub const KEYWORD_WEIGHT: f64 = 20.0;
/// Weight of a template pattern found in the text
pub const PATTERN_WEIGHT: f64 = 15.0;
/// Weight of an expected entity category that was detected
pub const ENTITY_TYPE_WEIGHT: f64 = 10.0;
/// Weight of an input field name overlapping a template field id
pub const FIELD_OVERLAP_WEIGHT: f64 = 25.0;
/// Weight of a key phrase containing a template keyword
pub const KEY_PHRASE_WEIGHT: f64 = 5.0;

/// Template scores in registry order
pub type TemplateScores = Vec<(String, f64)>;

/// Signals the scorer looks at
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    /// Document text (any case)
    pub text: &'a str,
    /// Detected entities
    pub entities: &'a [Entity],
    /// Detected key phrases
    pub key_phrases: &'a [String],
    /// Input field names
    pub field_names: &'a [String],
}

/// Raw score of every template, in registry order
pub fn score_templates(input: &ScoringInput<'_>, templates: &[TemplateDefinition]) -> TemplateScores {
    let text = input.text.to_lowercase();
    let categories: HashSet<String> = input
        .entities
        .iter()
        .map(|e| e.category.to_lowercase())
        .collect();
    let phrases: Vec<String> = input.key_phrases.iter().map(|p| p.to_lowercase()).collect();
    let field_names: Vec<String> = input
        .field_names
        .iter()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect();

    templates
        .iter()
        .map(|template| {
            let score = score_template(template, &text, &categories, &phrases, &field_names);
            (template.id.clone(), score)
        })
        .collect()
}

fn score_template(
    template: &TemplateDefinition,
    text: &str,
    categories: &HashSet<String>,
    phrases: &[String],
    field_names: &[String],
) -> f64 {
    let keywords: Vec<String> = lowered_non_empty(&template.keywords);

    let keyword_hits = keywords.iter().filter(|k| text.contains(k.as_str())).count();

    let pattern_hits = lowered_non_empty(&template.patterns)
        .iter()
        .filter(|p| text.contains(p.as_str()))
        .count();

    let entity_hits = template
        .expected_entity_types
        .iter()
        .filter(|t| categories.contains(&t.to_lowercase()))
        .count();

    let field_ids: Vec<String> = template
        .fields
        .iter()
        .map(|f| f.id.trim().to_lowercase())
        .filter(|id| !id.is_empty())
        .collect();
    let overlap_hits = field_names
        .iter()
        .map(|name| {
            field_ids
                .iter()
                .filter(|id| name.contains(id.as_str()) || id.contains(name.as_str()))
                .count()
        })
        .sum::<usize>();

    let phrase_hits = phrases
        .iter()
        .filter(|phrase| keywords.iter().any(|k| phrase.contains(k.as_str())))
        .count();

    keyword_hits as f64 * KEYWORD_WEIGHT
        + pattern_hits as f64 * PATTERN_WEIGHT
        + entity_hits as f64 * ENTITY_TYPE_WEIGHT
        + overlap_hits as f64 * FIELD_OVERLAP_WEIGHT
        + phrase_hits as f64 * KEY_PHRASE_WEIGHT
}

fn lowered_non_empty(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Divide every score by the best one
///
/// When the best score is 0 every normalized score is 0; no template is
/// preferred without evidence.
pub fn normalize_scores(raw: &[(String, f64)]) -> TemplateScores {
    let max = raw.iter().map(|(_, s)| *s).fold(0.0_f64, f64::max);
    raw.iter()
        .map(|(id, score)| {
            let normalized = if max > 0.0 { score / max } else { 0.0 };
            (id.clone(), normalized)
        })
        .collect()
}
