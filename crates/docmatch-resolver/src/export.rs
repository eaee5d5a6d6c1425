//! Canonical JSON projection of a resolution

use crate::coerce::coerce;
use crate::error::ResolverError;
use chrono::{DateTime, Utc};
use docmatch_domain::{FieldValue, TemplateDefinition, TemplateResolution};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata block of an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// Overall confidence of the resolution
    pub confidence: f64,
    /// When the resolution was produced
    pub extracted_at: DateTime<Utc>,
}

/// `{templateType, generatedAt, data, metadata}` view handed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionExport {
    /// Chosen template id, `null` when nothing matched
    pub template_type: Option<String>,
    /// When the export was produced
    pub generated_at: DateTime<Utc>,
    /// Field id to value
    pub data: BTreeMap<String, FieldValue>,
    /// Confidence and timing
    pub metadata: ExportMetadata,
}

impl ResolutionExport {
    /// Project a resolution
    pub fn from_resolution(resolution: &TemplateResolution) -> Self {
        Self {
            template_type: resolution.template_id().map(str::to_string),
            generated_at: Utc::now(),
            data: resolution
                .fields
                .iter()
                .map(|f| (f.field_id.clone(), f.value.clone()))
                .collect(),
            metadata: ExportMetadata {
                confidence: resolution.confidence,
                extracted_at: resolution.resolved_at,
            },
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ResolverError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an export back
    ///
    /// Values are read loosely (a text value that looks like a date comes
    /// back as a date); use [`ResolutionExport::typed_data`] to restore the
    /// field types.
    pub fn from_json(json: &str) -> Result<Self, ResolverError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Data re-coerced against the template's field types
    ///
    /// Keys without a matching field are dropped.
    pub fn typed_data(&self, template: &TemplateDefinition) -> BTreeMap<String, FieldValue> {
        template
            .fields
            .iter()
            .filter_map(|field| {
                self.data
                    .get(&field.id)
                    .map(|value| (field.id.clone(), coerce(value.clone(), field)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use docmatch_domain::{FieldResult, FieldSource, FieldSpec, FieldType, ResolutionId};

    fn resolution() -> (TemplateDefinition, TemplateResolution) {
        let template = TemplateDefinition::new("earned_leave", "Earned Leave", "leave")
            .with_field(FieldSpec::new("note", "Note", FieldType::Text))
            .with_field(FieldSpec::new("from_date", "From Date", FieldType::Date))
            .with_field(FieldSpec::new("days", "Days", FieldType::Number));
        let fields = vec![
            FieldResult {
                field_id: "note".into(),
                value: FieldValue::Text("2025-02-01".into()),
                confidence: 0.6,
                source: FieldSource::ContextMatch,
            },
            FieldResult {
                field_id: "from_date".into(),
                value: FieldValue::Date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()),
                confidence: 0.9,
                source: FieldSource::PatternMatch,
            },
            FieldResult {
                field_id: "days".into(),
                value: FieldValue::Null,
                confidence: 0.0,
                source: FieldSource::Default,
            },
        ];
        let resolution = TemplateResolution {
            id: ResolutionId::new(),
            template: Some(template.clone()),
            confidence: 0.72,
            template_confidence: 0.6,
            reasoning: String::new(),
            fields,
            per_template_scores: BTreeMap::new(),
            diagnostics: vec![],
            resolved_at: Utc::now(),
        };
        (template, resolution)
    }

    #[test]
    fn test_projection_shape() {
        let (_, resolution) = resolution();
        let export = ResolutionExport::from_resolution(&resolution);
        let value: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(value["templateType"], "earned_leave");
        assert_eq!(value["data"]["from_date"], "2025-02-01");
        assert!(value["data"]["days"].is_null());
        assert_eq!(value["metadata"]["confidence"], 0.72);
        assert!(value["metadata"]["extractedAt"].is_string());
        assert!(value["generatedAt"].is_string());
    }

    #[test]
    fn test_round_trip_restores_types() {
        let (template, resolution) = resolution();
        let export = ResolutionExport::from_resolution(&resolution);
        let parsed = ResolutionExport::from_json(&export.to_json().unwrap()).unwrap();
        assert_eq!(parsed.template_type, export.template_type);
        assert_eq!(parsed.metadata, export.metadata);
        assert_eq!(parsed.typed_data(&template), export.data);
    }

    #[test]
    fn test_no_template_exports_null() {
        let (_, mut resolution) = resolution();
        resolution.template = None;
        resolution.fields.clear();
        let export = ResolutionExport::from_resolution(&resolution);
        let value: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert!(value["templateType"].is_null());
        assert_eq!(value["data"], serde_json::json!({}));
    }
}
