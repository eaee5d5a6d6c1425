//! docmatch Collaborator Clients
//!
//! Implementations of the `SemanticClassifier` and `TextAnalyzer` traits from
//! `docmatch-domain`.
//!
//! # Clients
//!
//! - `HttpClassifier` / `HttpAnalyzer`: remote services over HTTP/JSON
//! - `MockClassifier` / `MockAnalyzer`: deterministic doubles for testing
//! - `Offline`: always unavailable, for running on local fallbacks only
//!
//! # Examples
//!
//! ```
//! use docmatch_llm::MockClassifier;
//! use docmatch_domain::traits::{ClassificationRequest, SemanticClassifier};
//!
//! let classifier = MockClassifier::answering("earned_leave", 0.9, "mentions earned leave");
//! let request = ClassificationRequest {
//!     text_excerpt: "earned leave application".to_string(),
//!     candidate_templates: vec![],
//! };
//! let result = classifier.classify(&request).unwrap();
//! assert_eq!(result.template_id, "earned_leave");
//! ```

#![warn(missing_docs)]

pub mod http;

use docmatch_domain::traits::{
    Classification, ClassificationRequest, SemanticClassifier, TextAnalysis, TextAnalyzer,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use http::{HttpAnalyzer, HttpClassifier};

/// Errors that can occur when talking to a collaborator
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// The collaborator is not configured or not reachable
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Scripted outcome of a mock call
#[derive(Debug, Clone)]
enum Scripted<T> {
    Answer(T),
    Fail(String),
}

impl<T: Clone> Scripted<T> {
    fn play(&self, delay: Option<Duration>) -> Result<T, LlmError> {
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        match self {
            Scripted::Answer(value) => Ok(value.clone()),
            Scripted::Fail(message) => Err(LlmError::Other(message.clone())),
        }
    }
}

/// Mock semantic classifier for deterministic testing
///
/// Returns a pre-configured classification (or error) without any network
/// calls. An optional delay blocks the calling thread, which is how timeouts
/// are exercised.
///
/// # Examples
///
/// ```
/// use docmatch_llm::MockClassifier;
/// use docmatch_domain::traits::{ClassificationRequest, SemanticClassifier};
///
/// let classifier = MockClassifier::failing("connection refused");
/// let request = ClassificationRequest { text_excerpt: String::new(), candidate_templates: vec![] };
/// assert!(classifier.classify(&request).is_err());
/// assert_eq!(classifier.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockClassifier {
    outcome: Scripted<Classification>,
    delay: Option<Duration>,
    healthy: bool,
    call_count: Arc<AtomicUsize>,
}

impl MockClassifier {
    /// Always answer with the given template and confidence
    pub fn answering(
        template_id: impl Into<String>,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::from_outcome(Scripted::Answer(Classification {
            template_id: template_id.into(),
            confidence,
            reasoning: reasoning.into(),
        }))
    }

    /// Always fail with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_outcome(Scripted::Fail(message.into()))
    }

    fn from_outcome(outcome: Scripted<Classification>) -> Self {
        Self {
            outcome,
            delay: None,
            healthy: true,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Block for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer health checks with `healthy`
    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// Get the number of times classify was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

impl SemanticClassifier for MockClassifier {
    type Error = LlmError;

    fn classify(&self, _request: &ClassificationRequest) -> Result<Classification, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.outcome.play(self.delay)
    }

    fn health_check(&self) -> bool {
        self.healthy
    }
}

/// Mock text analyzer for deterministic testing
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    outcome: Scripted<TextAnalysis>,
    delay: Option<Duration>,
    healthy: bool,
    call_count: Arc<AtomicUsize>,
}

impl MockAnalyzer {
    /// Always answer with the given analysis
    pub fn answering(analysis: TextAnalysis) -> Self {
        Self::from_outcome(Scripted::Answer(analysis))
    }

    /// Always fail with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_outcome(Scripted::Fail(message.into()))
    }

    fn from_outcome(outcome: Scripted<TextAnalysis>) -> Self {
        Self {
            outcome,
            delay: None,
            healthy: true,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Block for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer health checks with `healthy`
    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// Get the number of times analyze was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl TextAnalyzer for MockAnalyzer {
    type Error = LlmError;

    fn analyze(&self, _text: &str) -> Result<TextAnalysis, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.outcome.play(self.delay)
    }

    fn health_check(&self) -> bool {
        self.healthy
    }
}

/// Collaborator that is never available
///
/// Use when no remote services are configured; every call fails immediately
/// and the engine runs on its local fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl SemanticClassifier for Offline {
    type Error = LlmError;

    fn classify(&self, _request: &ClassificationRequest) -> Result<Classification, Self::Error> {
        Err(LlmError::Unavailable("no classifier configured".to_string()))
    }

    fn health_check(&self) -> bool {
        false
    }
}

impl TextAnalyzer for Offline {
    type Error = LlmError;

    fn analyze(&self, _text: &str) -> Result<TextAnalysis, Self::Error> {
        Err(LlmError::Unavailable("no analyzer configured".to_string()))
    }

    fn health_check(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmatch_domain::Entity;

    fn request() -> ClassificationRequest {
        ClassificationRequest {
            text_excerpt: "medical leave".to_string(),
            candidate_templates: vec![],
        }
    }

    #[test]
    fn test_mock_classifier_answer() {
        let classifier = MockClassifier::answering("medical_leave", 0.85, "sick note");
        let result = classifier.classify(&request()).unwrap();
        assert_eq!(result.template_id, "medical_leave");
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.reasoning, "sick note");
    }

    #[test]
    fn test_mock_classifier_error() {
        let classifier = MockClassifier::failing("boom");
        let result = classifier.classify(&request());
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[test]
    fn test_mock_classifier_call_count() {
        let classifier = MockClassifier::answering("t", 0.5, "");
        assert_eq!(classifier.call_count(), 0);

        classifier.classify(&request()).unwrap();
        classifier.classify(&request()).unwrap();
        assert_eq!(classifier.call_count(), 2);

        classifier.reset_call_count();
        assert_eq!(classifier.call_count(), 0);
    }

    #[test]
    fn test_mock_classifier_clone_shares_count() {
        let first = MockClassifier::answering("t", 0.5, "");
        let second = first.clone();

        first.classify(&request()).unwrap();

        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
    }

    #[test]
    fn test_mock_analyzer_answer() {
        let analysis = TextAnalysis {
            entities: vec![Entity::new("Asha Rao", "Person", 0.9)],
            key_phrases: vec!["leave".to_string()],
            ..Default::default()
        };
        let analyzer = MockAnalyzer::answering(analysis.clone());
        assert_eq!(analyzer.analyze("text").unwrap(), analysis);
        assert_eq!(analyzer.call_count(), 1);
    }

    #[test]
    fn test_offline_always_unavailable() {
        assert!(matches!(
            Offline.classify(&request()),
            Err(LlmError::Unavailable(_))
        ));
        assert!(matches!(Offline.analyze("x"), Err(LlmError::Unavailable(_))));
        assert!(!SemanticClassifier::health_check(&Offline));
        assert!(!TextAnalyzer::health_check(&Offline));
    }

    #[test]
    fn test_mock_health() {
        assert!(MockClassifier::failing("down").health_check());
        assert!(!MockClassifier::failing("down").with_health(false).health_check());
        assert!(!MockAnalyzer::failing("down").with_health(false).health_check());
    }
}
