//! Template module - the schemas documents are resolved against

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Type of a template field
///
/// Drives both coercion of extracted values and the choice of
/// pattern-based extraction for the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line free text
    Text,
    /// Numeric value
    Number,
    /// Calendar date
    Date,
    /// One of a fixed set of options
    Select,
    /// Multi-line free text
    Textarea,
    /// List of text items
    List,
}

impl FieldType {
    /// Get the field type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
            FieldType::List => "list",
        }
    }

    /// Parse a field type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(FieldType::Text),
            "number" => Some(FieldType::Number),
            "date" => Some(FieldType::Date),
            "select" => Some(FieldType::Select),
            "textarea" => Some(FieldType::Textarea),
            "list" => Some(FieldType::List),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a template schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Identifier, unique within the owning template
    pub id: String,

    /// Human-readable label, also used to locate the value in text
    pub label: String,

    /// Value type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the template considers this field mandatory
    #[serde(default)]
    pub required: bool,

    /// Allowed values for `select` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldSpec {
    /// Create a new optional field without options
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            required: false,
            options: None,
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the allowed options
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }
}

/// A registered document template
///
/// Templates are owned by an external registry and are read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    /// Template identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Grouping category (e.g. "leave", "disciplinary")
    #[serde(default)]
    pub category: String,

    /// Field schema, in display order
    #[serde(default)]
    pub fields: Vec<FieldSpec>,

    /// Keywords whose presence in the text is evidence for this template
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Literal phrases whose presence in the text is evidence for this template
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Entity categories documents of this template usually contain
    #[serde(default, alias = "expectedEntityTypes")]
    pub expected_entity_types: BTreeSet<String>,
}

impl TemplateDefinition {
    /// Create an empty template with the given identity
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            fields: Vec::new(),
            keywords: Vec::new(),
            patterns: Vec::new(),
            expected_entity_types: BTreeSet::new(),
        }
    }

    /// Add a field to the schema
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the keywords
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set the literal patterns
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the expected entity categories
    pub fn with_entity_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_entity_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Look up a field by id
    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Check the template's structural invariants
    ///
    /// Field ids must be non-empty and unique within the template.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("template id is empty".to_string());
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.id.trim().is_empty() {
                return Err(format!("template '{}' has a field with an empty id", self.id));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(format!(
                    "template '{}' declares field '{}' more than once",
                    self.id, field.id
                ));
            }
        }
        Ok(())
    }

    /// Summary sent to the external classifier
    pub fn descriptor(&self) -> TemplateDescriptor {
        TemplateDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            keywords: self.keywords.clone(),
        }
    }
}

/// Compact template summary used as a classifier candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// Template identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Grouping category
    pub category: String,
    /// Template keywords
    pub keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leave_template() -> TemplateDefinition {
        TemplateDefinition::new("earned_leave", "Earned Leave", "leave")
            .with_field(FieldSpec::new("applicant_name", "Applicant Name", FieldType::Text).required())
            .with_field(FieldSpec::new("from_date", "From Date", FieldType::Date))
            .with_keywords(["earned leave"])
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!(FieldType::parse("Date"), Some(FieldType::Date));
        assert_eq!(FieldType::parse(" textarea "), Some(FieldType::Textarea));
        assert_eq!(FieldType::parse("blob"), None);
    }

    #[test]
    fn test_valid_template() {
        assert!(leave_template().validate().is_ok());
    }

    #[test]
    fn test_duplicate_field_id_rejected() {
        let template = leave_template()
            .with_field(FieldSpec::new("from_date", "Start", FieldType::Date));
        let err = template.validate().unwrap_err();
        assert!(err.contains("from_date"));
    }

    #[test]
    fn test_empty_template_id_rejected() {
        let template = TemplateDefinition::new("  ", "Nameless", "misc");
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_descriptor_carries_keywords() {
        let descriptor = leave_template().descriptor();
        assert_eq!(descriptor.id, "earned_leave");
        assert_eq!(descriptor.keywords, vec!["earned leave".to_string()]);
    }

    #[test]
    fn test_field_spec_deserializes_type_key() {
        let spec: FieldSpec = serde_json::from_str(
            r#"{"id": "kind", "label": "Kind", "type": "select", "options": ["A", "B"]}"#,
        )
        .unwrap();
        assert_eq!(spec.field_type, FieldType::Select);
        assert!(!spec.required);
        assert_eq!(spec.options.as_deref(), Some(&["A".to_string(), "B".to_string()][..]));
    }

    #[test]
    fn test_expected_entity_types_alias() {
        let template: TemplateDefinition = serde_json::from_str(
            r#"{"id": "t", "name": "T", "expectedEntityTypes": ["Person"]}"#,
        )
        .unwrap();
        assert!(template.expected_entity_types.contains("Person"));
    }
}
