//! Local substitutes for the remote collaborators
//!
//! Both are deterministic and side-effect free.

use crate::config::FallbackConfig;
use crate::patterns::{DATE_TOKEN, NAME_TOKEN};
use docmatch_domain::document::categories;
use docmatch_domain::traits::{Classification, Sentiment, TextAnalysis};
use docmatch_domain::Entity;
use std::collections::HashSet;

/// Phrase that marks a fallback classification in the reasoning trace
pub const FALLBACK_MARKER: &str = "fallback classifier";

/// Confidence of a date entity found by the local analyzer
pub const FALLBACK_DATE_CONFIDENCE: f64 = 0.8;
/// Confidence of a person entity found by the local analyzer
pub const FALLBACK_PERSON_CONFIDENCE: f64 = 0.7;

/// Keyword-rule classifier used when the remote classifier is unavailable
#[derive(Debug, Clone)]
pub struct FallbackClassifier {
    config: FallbackConfig,
}

impl FallbackClassifier {
    /// Create a fallback classifier from its rules
    pub fn new(config: FallbackConfig) -> Self {
        Self { config }
    }

    /// Classify by the first rule with a keyword in the lower-cased text
    pub fn classify(&self, text: &str) -> Classification {
        let lower = text.to_lowercase();
        for rule in &self.config.rules {
            let hit = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .find(|k| !k.is_empty() && lower.contains(k.as_str()));
            if let Some(keyword) = hit {
                return Classification {
                    template_id: rule.template_id.clone(),
                    confidence: self.config.match_confidence,
                    reasoning: format!("{} matched keyword '{}'", FALLBACK_MARKER, keyword),
                };
            }
        }
        Classification {
            template_id: self.config.default_template_id.clone(),
            confidence: self.config.default_confidence,
            reasoning: format!("{} found no keyword, using default", FALLBACK_MARKER),
        }
    }
}

impl Default for FallbackClassifier {
    fn default() -> Self {
        Self::new(FallbackConfig::default())
    }
}

/// Regex-based entity and key-phrase analysis used when the remote analyzer is unavailable
///
/// Dates become `DateTime` entities, pairs of capitalized words become
/// `Person` entities, and the longest distinct words (more than four
/// characters) become key phrases.
pub fn fallback_analysis(text: &str, max_key_phrases: usize) -> TextAnalysis {
    let mut entities = Vec::new();
    let mut seen = HashSet::new();

    for m in DATE_TOKEN.find_iter(text) {
        if seen.insert((categories::DATE_TIME, m.as_str())) {
            entities.push(Entity::new(m.as_str(), categories::DATE_TIME, FALLBACK_DATE_CONFIDENCE));
        }
    }
    for m in NAME_TOKEN.find_iter(text) {
        if seen.insert((categories::PERSON, m.as_str())) {
            entities.push(Entity::new(m.as_str(), categories::PERSON, FALLBACK_PERSON_CONFIDENCE));
        }
    }

    TextAnalysis {
        entities,
        key_phrases: key_phrases(text, max_key_phrases),
        sentiment: Sentiment::neutral(),
    }
}

fn key_phrases(text: &str, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 4)
        .map(str::to_lowercase)
        .filter(|w| seen.insert(w.clone()))
        .collect();
    // stable: equal lengths keep first-appearance order
    words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    words.truncate(limit);
    words
}
