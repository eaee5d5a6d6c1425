//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use docmatch_domain::{FieldValue, TemplateDefinition, TemplateResolution};
use docmatch_resolver::ResolutionExport;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format one resolution.
    pub fn format_resolution(&self, source: &str, resolution: &TemplateResolution) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(resolution)?),
            OutputFormat::Export => Ok(ResolutionExport::from_resolution(resolution).to_json()?),
            OutputFormat::Table => Ok(self.format_resolution_table(source, resolution)),
        }
    }

    fn format_resolution_table(&self, source: &str, resolution: &TemplateResolution) -> String {
        let mut out = Vec::new();

        let heading = match &resolution.template {
            Some(template) => format!("{} → {} ({})", source, template.name, template.id),
            None => format!("{} → no template matched", source),
        };
        out.push(self.colorize(&heading, "cyan"));
        out.push(format!(
            "Confidence: {:.2} (template match {:.2})",
            resolution.confidence, resolution.template_confidence
        ));
        out.push(format!("Reasoning: {}", resolution.reasoning));

        if !resolution.fields.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value", "Confidence", "Source"]);
            for field in &resolution.fields {
                builder.push_record([
                    field.field_id.clone(),
                    display_value(&field.value),
                    format!("{:.2}", field.confidence),
                    field.source.to_string(),
                ]);
            }
            out.push(self.table(builder));
        }

        if !resolution.per_template_scores.is_empty() {
            let mut ranked: Vec<_> = resolution.per_template_scores.iter().collect();
            ranked.sort_by(|a, b| b.1.combined_score.total_cmp(&a.1.combined_score));

            let mut builder = Builder::default();
            builder.push_record(["Template", "Pattern", "Normalized", "External", "Combined"]);
            for (id, scores) in ranked {
                builder.push_record([
                    id.clone(),
                    format!("{}", scores.pattern_score),
                    format!("{:.2}", scores.normalized_pattern_score),
                    format!("{:.2}", scores.external_score),
                    format!("{:.2}", scores.combined_score),
                ]);
            }
            out.push(self.table(builder));
        }

        for diagnostic in &resolution.diagnostics {
            out.push(self.warning(&diagnostic.to_string()));
        }

        out.join("\n")
    }

    /// Format the template list.
    pub fn format_templates(&self, templates: &[TemplateDefinition]) -> Result<String> {
        match self.format {
            OutputFormat::Json | OutputFormat::Export => Ok(serde_json::to_string_pretty(templates)?),
            OutputFormat::Table => {
                if templates.is_empty() {
                    return Ok(self.colorize("No templates found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Category", "Fields", "Keywords"]);
                for template in templates {
                    builder.push_record([
                        template.id.clone(),
                        template.name.clone(),
                        template.category.clone(),
                        template.fields.len().to_string(),
                        template.keywords.join(", "),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "-".to_string(),
        FieldValue::List(items) if items.is_empty() => "-".to_string(),
        FieldValue::Text(s) if s.is_empty() => "-".to_string(),
        other => other.to_string(),
    }
}
