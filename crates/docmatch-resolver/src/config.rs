//! Configuration for the Resolver

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One keyword rule of the local fallback classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackRule {
    /// Lower-case keywords; any one of them triggers the rule
    pub keywords: Vec<String>,
    /// Template suggested when the rule fires
    pub template_id: String,
}

impl FallbackRule {
    /// Create a rule
    pub fn new<I, S>(keywords: I, template_id: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            template_id: template_id.into(),
        }
    }
}

/// Settings of the local fallback classifier
///
/// Rules are tested in order; the first rule with a keyword contained in the
/// lower-cased text wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Template suggested when no rule fires
    pub default_template_id: String,

    /// Confidence of a rule match
    pub match_confidence: f64,

    /// Confidence of the default suggestion
    pub default_confidence: f64,

    /// Ordered keyword rules
    pub rules: Vec<FallbackRule>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            default_template_id: "general_application".to_string(),
            match_confidence: 0.8,
            default_confidence: 0.5,
            rules: vec![
                FallbackRule::new(["medical", "sick"], "medical_leave"),
                FallbackRule::new(["punishment", "disciplinary"], "punishment"),
                FallbackRule::new(["earned leave", "annual leave"], "earned_leave"),
                FallbackRule::new(["casual leave"], "casual_leave"),
                FallbackRule::new(["transfer", "posting"], "transfer_request"),
            ],
        }
    }
}

/// Configuration for the Resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Maximum time for one classifier call (milliseconds)
    pub classifier_timeout_ms: u64,

    /// Maximum time for one analyzer call (milliseconds)
    pub analyzer_timeout_ms: u64,

    /// Extra attempts after a failed remote call (0 = single attempt)
    #[serde(default)]
    pub max_retries: u32,

    /// Base delay between attempts, doubled on every retry (milliseconds)
    pub retry_backoff_ms: u64,

    /// Number of leading characters sent to the classifier
    pub excerpt_chars: usize,

    /// How long a failed service is skipped before being tried again (seconds)
    pub health_recheck_secs: u64,

    /// Maximum key phrases produced by the local analyzer fallback
    pub max_key_phrases: usize,

    /// Key phrases quoted in the reasoning trace
    pub reasoning_key_phrases: usize,

    /// Local fallback classifier
    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl ResolverConfig {
    /// Classifier timeout as a Duration
    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_millis(self.classifier_timeout_ms)
    }

    /// Analyzer timeout as a Duration
    pub fn analyzer_timeout(&self) -> Duration {
        Duration::from_millis(self.analyzer_timeout_ms)
    }

    /// Retry base delay as a Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Health recheck interval as a Duration
    pub fn health_recheck(&self) -> Duration {
        Duration::from_secs(self.health_recheck_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.classifier_timeout_ms == 0 {
            return Err("classifier_timeout_ms must be greater than 0".to_string());
        }
        if self.analyzer_timeout_ms == 0 {
            return Err("analyzer_timeout_ms must be greater than 0".to_string());
        }
        if self.excerpt_chars == 0 {
            return Err("excerpt_chars must be greater than 0".to_string());
        }
        if self.max_key_phrases == 0 {
            return Err("max_key_phrases must be greater than 0".to_string());
        }
        if self.max_retries > 5 {
            return Err("max_retries cannot exceed 5".to_string());
        }
        let fallback = &self.fallback;
        if !(0.0..=1.0).contains(&fallback.match_confidence) {
            return Err("fallback.match_confidence must be within [0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&fallback.default_confidence) {
            return Err("fallback.default_confidence must be within [0, 1]".to_string());
        }
        for (idx, rule) in fallback.rules.iter().enumerate() {
            if rule.template_id.trim().is_empty() {
                return Err(format!("fallback rule {} has an empty template_id", idx));
            }
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(format!("fallback rule {} has no keywords", idx));
            }
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            classifier_timeout_ms: 5_000,
            analyzer_timeout_ms: 5_000,
            max_retries: 0,
            retry_backoff_ms: 250,
            excerpt_chars: 2_000,
            health_recheck_secs: 60,
            max_key_phrases: 10,
            reasoning_key_phrases: 5,
            fallback: FallbackConfig::default(),
        }
    }
}

impl ResolverConfig {
    /// Aggressive preset: short timeouts, quick to give up on remote services
    pub fn aggressive() -> Self {
        Self {
            classifier_timeout_ms: 1_500,
            analyzer_timeout_ms: 1_500,
            max_retries: 0,
            retry_backoff_ms: 100,
            excerpt_chars: 1_000,
            health_recheck_secs: 30,
            max_key_phrases: 10,
            reasoning_key_phrases: 3,
            fallback: FallbackConfig::default(),
        }
    }

    /// Lenient preset: long timeouts and retries for slow remote services
    pub fn lenient() -> Self {
        Self {
            classifier_timeout_ms: 15_000,
            analyzer_timeout_ms: 15_000,
            max_retries: 2,
            retry_backoff_ms: 500,
            excerpt_chars: 4_000,
            health_recheck_secs: 300,
            max_key_phrases: 10,
            reasoning_key_phrases: 5,
            fallback: FallbackConfig::default(),
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ResolverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ResolverConfig::aggressive().validate().is_ok());
        assert!(ResolverConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_default_is_single_attempt() {
        assert_eq!(ResolverConfig::default().max_retries, 0);
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ResolverConfig::default();
        config.classifier_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_fallback_confidence() {
        let mut config = ResolverConfig::default();
        config.fallback.match_confidence = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_fallback_rule() {
        let mut config = ResolverConfig::default();
        config.fallback.rules.push(FallbackRule::new(Vec::<String>::new(), "x"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ResolverConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = ResolverConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.classifier_timeout_ms, parsed.classifier_timeout_ms);
        assert_eq!(config.max_retries, parsed.max_retries);
        assert_eq!(config.fallback, parsed.fallback);
    }

    #[test]
    fn test_partial_toml_uses_default_fallback() {
        let parsed = ResolverConfig::from_toml(
            r#"
            classifier_timeout_ms = 800
            analyzer_timeout_ms = 800
            retry_backoff_ms = 50
            excerpt_chars = 500
            health_recheck_secs = 10
            max_key_phrases = 8
            reasoning_key_phrases = 2
            "#,
        )
        .unwrap();
        assert_eq!(parsed.max_retries, 0);
        assert_eq!(parsed.fallback, FallbackConfig::default());
    }
}
