//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the resolution engine and its
//! collaborators. Implementations live in other crates.

use crate::audit::AuditEvent;
use crate::document::Entity;
use crate::template::{TemplateDefinition, TemplateDescriptor};
use serde::{Deserialize, Serialize};

/// Source of registered templates
///
/// Implemented by `docmatch-resolver` (static and file-backed registries)
pub trait TemplateRegistry {
    /// Error type for registry operations
    type Error;

    /// List every registered template, in registry order
    fn list_templates(&self) -> Result<Vec<TemplateDefinition>, Self::Error>;
}

/// Request sent to the semantic classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRequest {
    /// Leading excerpt of the document text
    pub text_excerpt: String,
    /// Templates the classifier may choose from
    pub candidate_templates: Vec<TemplateDescriptor>,
}

/// Answer of the semantic classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Chosen template id
    pub template_id: String,
    /// Confidence [0.0, 1.0]
    pub confidence: f64,
    /// Free-text explanation
    #[serde(default)]
    pub reasoning: String,
}

/// Trait for semantic template classification
///
/// Implemented by the infrastructure layer (docmatch-llm)
pub trait SemanticClassifier {
    /// Error type for classifier operations
    type Error;

    /// Pick the best-matching candidate template for a text excerpt
    fn classify(&self, request: &ClassificationRequest) -> Result<Classification, Self::Error>;

    /// Whether the service is reachable
    ///
    /// Probed before a service marked unhealthy is called again.
    fn health_check(&self) -> bool {
        true
    }
}

/// Overall tone of a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Label such as `positive`, `neutral`, `negative`
    pub label: String,
    /// Strength [0.0, 1.0]
    pub score: f64,
}

impl Sentiment {
    /// Neutral sentiment with score 0.5
    pub fn neutral() -> Self {
        Self {
            label: "neutral".to_string(),
            score: 0.5,
        }
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Entities and key phrases found in a text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    /// Detected entities
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Salient phrases
    #[serde(default)]
    pub key_phrases: Vec<String>,
    /// Overall sentiment
    #[serde(default)]
    pub sentiment: Sentiment,
}

/// Trait for entity and key-phrase analysis
///
/// Implemented by the infrastructure layer (docmatch-llm)
pub trait TextAnalyzer {
    /// Error type for analyzer operations
    type Error;

    /// Analyze a text
    fn analyze(&self, text: &str) -> Result<TextAnalysis, Self::Error>;

    /// Whether the service is reachable
    fn health_check(&self) -> bool {
        true
    }
}

/// Receiver of audit events
///
/// Delivery is fire-and-forget; the engine never waits on or inspects it.
pub trait AuditSink {
    /// Record one event
    fn record(&self, event: AuditEvent);
}
