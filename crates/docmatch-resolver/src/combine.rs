//! Score combination: local pattern scores blended with the remote classifier

use docmatch_domain::confidence;
use docmatch_domain::traits::Classification;
use docmatch_domain::ScoreBreakdown;
use std::collections::BTreeMap;

/// Weight of the remote classifier's confidence
pub const EXTERNAL_WEIGHT: f64 = 0.4;
/// Weight of the normalized pattern score
pub const LOCAL_WEIGHT: f64 = 0.6;

/// Ranked decision over all templates
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedDecision {
    /// Winning template id, `None` when no template has any evidence
    pub best_template: Option<String>,
    /// Template-match confidence [0.0, 1.0]
    pub confidence: f64,
    /// Full trace per template
    pub per_template_scores: BTreeMap<String, ScoreBreakdown>,
}

/// Combine raw and normalized pattern scores with an optional remote classification
///
/// `raw` and `normalized` are in registry order; ties go to the earlier template.
/// Only a remote classification contributes an external score.
pub fn combine(
    raw: &[(String, f64)],
    normalized: &[(String, f64)],
    external: Option<&Classification>,
) -> CombinedDecision {
    let mut per_template_scores = BTreeMap::new();
    let mut best: Option<(&str, f64)> = None;

    for ((id, pattern_score), (_, normalized_score)) in raw.iter().zip(normalized) {
        let external_score = external
            .filter(|c| c.template_id == *id)
            .map(|c| confidence::clamp(c.confidence))
            .unwrap_or(0.0);
        let normalized_score = confidence::clamp(*normalized_score);
        let combined =
            confidence::clamp(EXTERNAL_WEIGHT * external_score + LOCAL_WEIGHT * normalized_score);

        per_template_scores.insert(
            id.clone(),
            ScoreBreakdown {
                pattern_score: pattern_score.max(0.0),
                external_score,
                normalized_pattern_score: normalized_score,
                combined_score: combined,
            },
        );

        if best.map_or(true, |(_, score)| combined > score) {
            best = Some((id.as_str(), combined));
        }
    }

    match best {
        Some((id, score)) if score > 0.0 => CombinedDecision {
            best_template: Some(id.to_string()),
            confidence: score.min(1.0),
            per_template_scores,
        },
        _ => CombinedDecision {
            best_template: None,
            confidence: 0.0,
            per_template_scores,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::normalize_scores;
    use proptest::prelude::*;

    fn scores(values: &[(&str, f64)]) -> Vec<(String, f64)> {
        values.iter().map(|(id, s)| (id.to_string(), *s)).collect()
    }

    fn classification(id: &str, confidence: f64) -> Classification {
        Classification {
            template_id: id.to_string(),
            confidence,
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_empty_templates() {
        let decision = combine(&[], &[], None);
        assert_eq!(decision.best_template, None);
        assert_eq!(decision.confidence, 0.0);
        assert!(decision.per_template_scores.is_empty());
    }

    #[test]
    fn test_pattern_only() {
        let raw = scores(&[("a", 40.0), ("b", 20.0)]);
        let normalized = scores(&[("a", 1.0), ("b", 0.5)]);
        let decision = combine(&raw, &normalized, None);
        assert_eq!(decision.best_template.as_deref(), Some("a"));
        assert!((decision.confidence - 0.6).abs() < 1e-9);
        assert_eq!(decision.per_template_scores["b"].external_score, 0.0);
    }

    #[test]
    fn test_external_score_can_flip_decision() {
        let raw = scores(&[("a", 40.0), ("b", 36.0)]);
        let normalized = scores(&[("a", 1.0), ("b", 0.9)]);
        let decision = combine(&raw, &normalized, Some(&classification("b", 0.9)));
        // a: 0.6, b: 0.4 * 0.9 + 0.6 * 0.9 = 0.9
        assert_eq!(decision.best_template.as_deref(), Some("b"));
        assert!((decision.per_template_scores["b"].combined_score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_no_evidence_yields_no_template() {
        let raw = scores(&[("a", 0.0), ("b", 0.0)]);
        let decision = combine(&raw, &raw.clone(), None);
        assert_eq!(decision.best_template, None);
        assert_eq!(decision.confidence, 0.0);
        assert_eq!(decision.per_template_scores.len(), 2);
    }

    #[test]
    fn test_tie_goes_to_first_template() {
        let raw = scores(&[("a", 10.0), ("b", 10.0)]);
        let normalized = scores(&[("a", 1.0), ("b", 1.0)]);
        let decision = combine(&raw, &normalized, None);
        assert_eq!(decision.best_template.as_deref(), Some("a"));
    }

    #[test]
    fn test_external_confidence_clamped() {
        let raw = scores(&[("a", 0.0)]);
        let decision = combine(&raw, &raw.clone(), Some(&classification("a", 3.0)));
        assert_eq!(decision.per_template_scores["a"].external_score, 1.0);
        assert!((decision.confidence - 0.4).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn breakdown_scores_stay_in_unit_range(
            raw in proptest::collection::vec(0.0f64..500.0, 1..8),
            pick in 0usize..8,
            external in -2.0f64..3.0,
        ) {
            let raw: Vec<(String, f64)> = raw
                .into_iter()
                .enumerate()
                .map(|(i, s)| (format!("t{}", i), s))
                .collect();
            let normalized = normalize_scores(&raw);
            let named = classification(&format!("t{}", pick % raw.len()), external);
            let decision = combine(&raw, &normalized, Some(&named));

            prop_assert!((0.0..=1.0).contains(&decision.confidence));
            for breakdown in decision.per_template_scores.values() {
                prop_assert!(breakdown.pattern_score >= 0.0);
                prop_assert!((0.0..=1.0).contains(&breakdown.external_score));
                prop_assert!((0.0..=1.0).contains(&breakdown.normalized_pattern_score));
                prop_assert!((0.0..=1.0).contains(&breakdown.combined_score));
            }
        }
    }
}
