//! HTTP Collaborator Clients
//!
//! JSON-over-HTTP clients for the remote semantic classifier and the remote
//! entity/key-phrase analyzer.
//!
//! # Features
//!
//! - Configurable endpoint and request timeout
//! - Tolerates markdown-fenced JSON and reports anything else as `InvalidResponse`
//! - `GET /health` probe, used before re-trying a service marked unhealthy
//!
//! Both clients are blocking; the resolver runs them on the blocking pool.
//!
//! # Examples
//!
//! ```no_run
//! use docmatch_llm::HttpClassifier;
//! use docmatch_domain::traits::SemanticClassifier;
//!
//! let classifier = HttpClassifier::new("http://localhost:8700").unwrap();
//! let healthy = classifier.health_check();
//! ```

use crate::LlmError;
use docmatch_domain::traits::{
    Classification, ClassificationRequest, SemanticClassifier, TextAnalysis, TextAnalyzer,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Default request timeout (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Shared blocking JSON transport
#[derive(Debug, Clone)]
struct JsonTransport {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl JsonTransport {
    fn new(endpoint: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn post<B, T>(&self, path: &str, body: &B) -> Result<T, LlmError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.endpoint, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        let text = response.text().map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, text)));
        }

        parse_json_body(&text)
    }

    fn health(&self) -> bool {
        let url = format!("{}/health", self.endpoint);
        match self.client.get(&url).send() {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health check against {} failed: {}", url, e);
                false
            }
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Communication(format!("Request failed: {}", e))
    }
}

/// Parse a JSON response body, accepting a markdown code fence around it
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &str) -> Result<T, LlmError> {
    let json = strip_code_fence(body);
    if json.is_empty() {
        return Err(LlmError::InvalidResponse("Empty response body".to_string()));
    }
    serde_json::from_str(json)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

fn strip_code_fence(body: &str) -> &str {
    let trimmed = body.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    // Drop the opening fence line (```json or ```) and the closing fence
    let inner = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return "",
    };
    inner.trim_end().trim_end_matches("```").trim()
}

/// Remote semantic classifier
///
/// `POST {endpoint}/classify` with `{textExcerpt, candidateTemplates}`,
/// answered by `{templateId, confidence, reasoning}`.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    transport: JsonTransport,
}

impl HttpClassifier {
    /// Create a classifier client with the default timeout
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a classifier client with a specific request timeout
    pub fn with_timeout(endpoint: impl AsRef<str>, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            transport: JsonTransport::new(endpoint.as_ref(), timeout)?,
        })
    }

    /// Endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.transport.endpoint
    }
}

impl SemanticClassifier for HttpClassifier {
    type Error = LlmError;

    fn classify(&self, request: &ClassificationRequest) -> Result<Classification, Self::Error> {
        self.transport.post("/classify", request)
    }

    /// Probe `GET {endpoint}/health`
    fn health_check(&self) -> bool {
        self.transport.health()
    }
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Remote entity and key-phrase analyzer
///
/// `POST {endpoint}/analyze` with `{text}`, answered by
/// `{entities, keyPhrases, sentiment}`.
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    transport: JsonTransport,
}

impl HttpAnalyzer {
    /// Create an analyzer client with the default timeout
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create an analyzer client with a specific request timeout
    pub fn with_timeout(endpoint: impl AsRef<str>, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            transport: JsonTransport::new(endpoint.as_ref(), timeout)?,
        })
    }

    /// Endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.transport.endpoint
    }
}

impl TextAnalyzer for HttpAnalyzer {
    type Error = LlmError;

    fn analyze(&self, text: &str) -> Result<TextAnalysis, Self::Error> {
        self.transport.post("/analyze", &AnalyzeRequest { text })
    }

    /// Probe `GET {endpoint}/health`
    fn health_check(&self) -> bool {
        self.transport.health()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_creation_trims_slash() {
        let classifier = HttpClassifier::new("http://localhost:8700/").unwrap();
        assert_eq!(classifier.endpoint(), "http://localhost:8700");
    }

    #[test]
    fn test_parse_plain_json() {
        let parsed: Classification = parse_json_body(
            r#"{"templateId": "earned_leave", "confidence": 0.9, "reasoning": "keywords"}"#,
        )
        .unwrap();
        assert_eq!(parsed.template_id, "earned_leave");
        assert_eq!(parsed.confidence, 0.9);
    }

    #[test]
    fn test_parse_fenced_json() {
        let body = "```json\n{\"templateId\": \"punishment\", \"confidence\": 0.7}\n```";
        let parsed: Classification = parse_json_body(body).unwrap();
        assert_eq!(parsed.template_id, "punishment");
        assert_eq!(parsed.reasoning, "");
    }

    #[test]
    fn test_parse_non_json_is_invalid_response() {
        let result: Result<Classification, _> = parse_json_body("<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_empty_body() {
        let result: Result<TextAnalysis, _> = parse_json_body("   ");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_analysis_defaults() {
        let analysis: TextAnalysis =
            parse_json_body(r#"{"entities": [], "keyPhrases": ["annual leave"]}"#).unwrap();
        assert_eq!(analysis.key_phrases, vec!["annual leave".to_string()]);
        assert_eq!(analysis.sentiment.label, "neutral");
    }

    #[test]
    fn test_classifier_error_handling() {
        // Invalid port makes the request fail before any I/O
        let classifier = HttpClassifier::with_timeout(
            "http://localhost:99999",
            Duration::from_millis(200),
        )
        .unwrap();
        let request = ClassificationRequest {
            text_excerpt: "test".to_string(),
            candidate_templates: vec![],
        };

        match classifier.classify(&request) {
            Err(LlmError::Communication(_)) | Err(LlmError::Timeout) => {}
            other => panic!("Expected communication failure, got {:?}", other),
        }
        assert!(!classifier.health_check());
    }

    #[test]
    #[ignore] // Only run when a classifier service is available
    fn test_classifier_integration() {
        let classifier = HttpClassifier::new("http://localhost:8700").unwrap();
        let request = ClassificationRequest {
            text_excerpt: "application for earned leave".to_string(),
            candidate_templates: vec![],
        };
        if let Ok(result) = classifier.classify(&request) {
            assert!(!result.template_id.is_empty());
        }
    }
}
