//! Request types and intermediate signals

use docmatch_domain::{Diagnostic, Entity, ExtractedDocument, KvPair};
use serde_json::Value;

/// Input accepted by the resolver
#[derive(Debug, Clone)]
pub enum DocumentInput {
    /// Output of the upstream digitization step
    Document(ExtractedDocument),

    /// Arbitrary nested key/value structure (e.g. a submitted form as JSON)
    Structured(Value),

    /// Unparsed payload; read as JSON when possible, as plain text otherwise
    Raw(String),
}

impl From<ExtractedDocument> for DocumentInput {
    fn from(doc: ExtractedDocument) -> Self {
        DocumentInput::Document(doc)
    }
}

impl From<Value> for DocumentInput {
    fn from(value: Value) -> Self {
        DocumentInput::Structured(value)
    }
}

/// Request to resolve one document
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    /// Caller's identifier for the document, used as the audit resource id
    pub document_id: Option<String>,

    /// Document content
    pub input: DocumentInput,
}

impl ResolutionRequest {
    /// Create a request without a document id
    pub fn new(input: impl Into<DocumentInput>) -> Self {
        Self {
            document_id: None,
            input: input.into(),
        }
    }

    /// Set the document id
    pub fn with_document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }
}

/// Flattened view of any input
#[derive(Debug, Clone, Default)]
pub struct NormalizedSignals {
    /// Text blob, case preserved
    pub text: String,

    /// Line-indexed view of the text
    pub lines: Vec<String>,

    /// Whether `lines` reflect real line breaks (false for structured input)
    pub lines_meaningful: bool,

    /// Names of input fields (structured keys or key/value pair keys)
    pub field_names: Vec<String>,

    /// Entities supplied with the input
    pub entities: Vec<Entity>,

    /// Key/value pairs supplied with the input
    pub key_value_pairs: Vec<KvPair>,

    /// Upstream digitization confidence, when supplied
    pub base_confidence: Option<f64>,

    /// Conditions noticed while normalizing
    pub diagnostics: Vec<Diagnostic>,
}
