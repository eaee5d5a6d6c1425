//! Confidence aggregation and the human-readable reasoning trace

use crate::fallback::FALLBACK_MARKER;
use docmatch_domain::traits::Classification;
use docmatch_domain::{confidence, Entity, FieldResult, TemplateDefinition};

/// Weight of the upstream digitization confidence
pub const BASE_WEIGHT: f64 = 0.3;
/// Weight of the template-match confidence
pub const TEMPLATE_WEIGHT: f64 = 0.3;
/// Weight of the mean field confidence
pub const FIELD_WEIGHT: f64 = 0.4;

/// How the classifier contributed to the decision
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierTrace {
    /// The remote classifier answered
    Remote(Classification),
    /// The remote classifier failed; the local rules suggested a template
    Fallback {
        /// Suggestion of the local classifier
        suggestion: Classification,
        /// Why the remote call was not used
        reason: String,
    },
    /// No classification was attempted (no templates)
    NotRun,
}

/// Overall confidence of a resolution
///
/// `0.3 * base + 0.3 * template_match + 0.4 * mean(field confidences)`,
/// clamped to [0.0, 1.0]. An empty field list has mean 0.
pub fn overall_confidence(base: f64, template_match: f64, fields: &[FieldResult]) -> f64 {
    let field_mean = confidence::mean(fields.iter().map(|f| f.confidence));
    confidence::weighted(&[
        (BASE_WEIGHT, confidence::clamp(base)),
        (TEMPLATE_WEIGHT, confidence::clamp(template_match)),
        (FIELD_WEIGHT, field_mean),
    ])
}

/// Inputs of the reasoning trace
#[derive(Debug, Clone, Copy)]
pub struct ReasoningParts<'a> {
    /// Chosen template, if any
    pub template: Option<&'a TemplateDefinition>,
    /// All entities considered
    pub entities: &'a [Entity],
    /// Key phrases from the analyzer
    pub key_phrases: &'a [String],
    /// Raw pattern scores in registry order
    pub pattern_scores: &'a [(String, f64)],
    /// Classifier contribution
    pub classifier: &'a ClassifierTrace,
    /// Whether the local analyzer replaced the remote one
    pub analyzer_fallback: bool,
    /// How many key phrases to mention
    pub max_key_phrases: usize,
}

/// Build the `; `-separated reasoning string
pub fn build_reasoning(parts: &ReasoningParts<'_>) -> String {
    let mut out = Vec::new();

    out.push(match parts.template {
        Some(template) => format!("Matched template '{}'", template.name),
        None => "No template matched".to_string(),
    });

    let mut categories: Vec<&str> = Vec::new();
    for entity in parts.entities {
        if !categories.contains(&entity.category.as_str()) {
            categories.push(&entity.category);
        }
    }
    if !categories.is_empty() {
        out.push(format!("entities: {}", categories.join(", ")));
    }

    if !parts.key_phrases.is_empty() && parts.max_key_phrases > 0 {
        let phrases: Vec<&str> = parts
            .key_phrases
            .iter()
            .take(parts.max_key_phrases)
            .map(String::as_str)
            .collect();
        out.push(format!("key phrases: {}", phrases.join(", ")));
    }

    let mut ranked: Vec<&(String, f64)> = parts.pattern_scores.iter().collect();
    // stable: equal scores keep registry order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    if !ranked.is_empty() {
        let top: Vec<String> = ranked
            .iter()
            .take(3)
            .map(|(id, score)| format!("{}={}", id, score))
            .collect();
        out.push(format!("pattern scores: {}", top.join(", ")));
    }

    match parts.classifier {
        ClassifierTrace::Remote(classification) => {
            let reasoning = classification.reasoning.trim();
            if reasoning.is_empty() {
                out.push(format!(
                    "classifier suggested {} ({:.2})",
                    classification.template_id, classification.confidence
                ));
            } else {
                out.push(format!("classifier: {}", reasoning));
            }
        }
        ClassifierTrace::Fallback { suggestion, reason } => {
            out.push(format!(
                "{} suggested {} ({:.2}) after remote failure: {}",
                FALLBACK_MARKER, suggestion.template_id, suggestion.confidence, reason
            ));
        }
        ClassifierTrace::NotRun => {}
    }

    if parts.analyzer_fallback {
        out.push("entity analysis used local fallback".to_string());
    }

    out.join("; ")
}
