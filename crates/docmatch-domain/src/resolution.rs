//! Resolution module - the engine's output

use crate::field::FieldResult;
use crate::template::TemplateDefinition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for a resolution based on UUIDv7
///
/// UUIDv7 keeps identifiers chronologically sortable, which is what audit
/// trails sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ResolutionId(u128);

impl ResolutionId {
    /// Generate a new UUIDv7-based ResolutionId
    ///
    /// # Examples
    ///
    /// ```
    /// use docmatch_domain::ResolutionId;
    ///
    /// let id = ResolutionId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Parse a ResolutionId from a UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use docmatch_domain::ResolutionId;
    ///
    /// let id = ResolutionId::new();
    /// let parsed = ResolutionId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUID string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ResolutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResolutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl From<ResolutionId> for String {
    fn from(id: ResolutionId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ResolutionId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_string(&s)
    }
}

/// Per-template scoring trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Raw additive keyword/pattern score (>= 0)
    pub pattern_score: f64,
    /// Confidence the remote classifier gave this template, 0 if it named another
    pub external_score: f64,
    /// Pattern score divided by the best pattern score
    pub normalized_pattern_score: f64,
    /// Weighted blend of external and normalized pattern scores
    pub combined_score: f64,
}

/// A condition the engine absorbed instead of failing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Input could not be parsed as structured data and was read as plain text
    InputMalformed {
        /// Parse failure
        reason: String,
    },
    /// A remote collaborator failed, timed out or was skipped; a local fallback ran
    ExternalServiceFailure {
        /// Which collaborator (`classifier` or `analyzer`)
        service: String,
        /// Failure description
        reason: String,
    },
    /// The registry returned no templates
    NoTemplatesAvailable,
    /// A required field could not be resolved and holds its type default
    FieldExtractionGap {
        /// Id of the unresolved field
        field_id: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InputMalformed { reason } => write!(f, "input malformed: {}", reason),
            Diagnostic::ExternalServiceFailure { service, reason } => {
                write!(f, "{} unavailable: {}", service, reason)
            }
            Diagnostic::NoTemplatesAvailable => f.write_str("no templates available"),
            Diagnostic::FieldExtractionGap { field_id } => {
                write!(f, "required field '{}' not found", field_id)
            }
        }
    }
}

/// Final output of one resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResolution {
    /// Resolution identifier
    pub id: ResolutionId,

    /// Chosen template, or `None` when nothing matched
    pub template: Option<TemplateDefinition>,

    /// Overall confidence [0.0, 1.0]
    pub confidence: f64,

    /// Template-match confidence from the score combiner [0.0, 1.0]
    pub template_confidence: f64,

    /// Human-readable trace of the decision
    pub reasoning: String,

    /// One entry per field of the chosen template, in schema order
    pub fields: Vec<FieldResult>,

    /// Scoring trace keyed by template id
    pub per_template_scores: BTreeMap<String, ScoreBreakdown>,

    /// Conditions absorbed while resolving
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,

    /// When the resolution was produced
    pub resolved_at: DateTime<Utc>,
}

impl TemplateResolution {
    /// Id of the chosen template, if any
    pub fn template_id(&self) -> Option<&str> {
        self.template.as_ref().map(|t| t.id.as_str())
    }

    /// Look up a field result by field id
    pub fn field(&self, field_id: &str) -> Option<&FieldResult> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }

    /// Whether any remote collaborator was replaced by its local fallback
    pub fn used_fallback(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::ExternalServiceFailure { .. }))
    }
}
