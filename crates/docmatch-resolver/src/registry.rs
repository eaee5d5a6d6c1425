//! Template registries
//!
//! `StaticRegistry` holds an in-memory set (including the built-in set
//! shipped with the crate); `FileRegistry` re-reads a TOML or JSON file on
//! every call so edits are picked up without a restart.

use crate::error::RegistryError;
use docmatch_domain::traits::TemplateRegistry;
use docmatch_domain::TemplateDefinition;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

const BUILTIN_TEMPLATES: &str = include_str!("../templates/builtin.toml");

#[derive(Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: Vec<TemplateDefinition>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonTemplates {
    List(Vec<TemplateDefinition>),
    Wrapped { templates: Vec<TemplateDefinition> },
}

/// Check every template and the uniqueness of template ids
pub fn validate_templates(templates: &[TemplateDefinition]) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for template in templates {
        template.validate().map_err(RegistryError::Invalid)?;
        if !seen.insert(template.id.as_str()) {
            return Err(RegistryError::Invalid(format!(
                "template id '{}' is declared more than once",
                template.id
            )));
        }
    }
    Ok(())
}

/// Parse a `[[templates]]` TOML document
pub fn parse_templates_toml(content: &str) -> Result<Vec<TemplateDefinition>, RegistryError> {
    let file: TemplateFile = toml::from_str(content)?;
    validate_templates(&file.templates)?;
    Ok(file.templates)
}

/// Parse a JSON array of templates, or an object with a `templates` array
pub fn parse_templates_json(content: &str) -> Result<Vec<TemplateDefinition>, RegistryError> {
    let templates = match serde_json::from_str(content)? {
        JsonTemplates::List(templates) => templates,
        JsonTemplates::Wrapped { templates } => templates,
    };
    validate_templates(&templates)?;
    Ok(templates)
}

/// In-memory template registry
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    templates: Vec<TemplateDefinition>,
}

impl StaticRegistry {
    /// Create a registry from validated templates
    pub fn new(templates: Vec<TemplateDefinition>) -> Result<Self, RegistryError> {
        validate_templates(&templates)?;
        Ok(Self { templates })
    }

    /// Registry with no templates
    pub fn empty() -> Self {
        Self::default()
    }

    /// Templates shipped with the crate
    pub fn builtin() -> Result<Self, RegistryError> {
        Ok(Self {
            templates: parse_templates_toml(BUILTIN_TEMPLATES)?,
        })
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the registry holds no templates
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateRegistry for StaticRegistry {
    type Error = RegistryError;

    fn list_templates(&self) -> Result<Vec<TemplateDefinition>, Self::Error> {
        Ok(self.templates.clone())
    }
}

/// Registry backed by a template file
///
/// The format is chosen by extension: `.json` is read as JSON, anything else
/// as TOML.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    /// Create a registry for `path`; the file is not read until first use
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the template file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"))
    }
}

impl TemplateRegistry for FileRegistry {
    type Error = RegistryError;

    fn list_templates(&self) -> Result<Vec<TemplateDefinition>, Self::Error> {
        let content = std::fs::read_to_string(&self.path)?;
        let templates = if self.is_json() {
            parse_templates_json(&content)?
        } else {
            parse_templates_toml(&content)?
        };
        debug!(
            "Loaded {} templates from {}",
            templates.len(),
            self.path.display()
        );
        Ok(templates)
    }
}
