//! Extracted document module - the upstream digitization output

use serde::{Deserialize, Serialize};

/// Well-known entity categories
pub mod categories {
    /// People
    pub const PERSON: &str = "Person";
    /// Dates and times
    pub const DATE_TIME: &str = "DateTime";
    /// Organizations, offices, stations
    pub const ORGANIZATION: &str = "Organization";
    /// Places and addresses
    pub const LOCATION: &str = "Location";
}

/// A detected entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Surface text of the entity
    pub text: String,
    /// Category such as `Person` or `DateTime`
    pub category: String,
    /// Detection confidence [0.0, 1.0]
    pub confidence: f64,
}

impl Entity {
    /// Create a new entity
    pub fn new(text: impl Into<String>, category: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            confidence,
        }
    }
}

/// A key/value pair detected by form analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KvPair {
    /// Key text as printed on the form
    pub key: String,
    /// Value text
    pub value: String,
    /// Detection confidence [0.0, 1.0]
    pub confidence: f64,
}

impl KvPair {
    /// Create a new key/value pair
    pub fn new(key: impl Into<String>, value: impl Into<String>, confidence: f64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            confidence,
        }
    }
}

/// One line of digitized text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSignal {
    /// Line content
    pub text: String,
    /// Recognition confidence, when the digitizer reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Output of the upstream document-intelligence step
///
/// Produced once per document and never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    /// Full digitized text
    #[serde(default)]
    pub raw_text: String,

    /// Entities detected upstream
    #[serde(default)]
    pub entities: Vec<Entity>,

    /// Key/value pairs detected upstream
    #[serde(default)]
    pub key_value_pairs: Vec<KvPair>,

    /// Natural line breaks of the document, in reading order
    #[serde(default)]
    pub lines: Vec<LineSignal>,

    /// Overall digitization confidence, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ExtractedDocument {
    /// Create a document from plain text
    ///
    /// Lines are derived from the text's own line breaks.
    pub fn from_text(text: impl Into<String>) -> Self {
        let raw_text = text.into();
        let lines = raw_text
            .lines()
            .map(|l| LineSignal {
                text: l.to_string(),
                confidence: None,
            })
            .collect();
        Self {
            raw_text,
            lines,
            ..Default::default()
        }
    }

    /// Add detected entities
    pub fn with_entities(mut self, entities: Vec<Entity>) -> Self {
        self.entities = entities;
        self
    }

    /// Add detected key/value pairs
    pub fn with_key_value_pairs(mut self, pairs: Vec<KvPair>) -> Self {
        self.key_value_pairs = pairs;
        self
    }

    /// Set the digitization confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}
