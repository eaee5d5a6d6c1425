//! Collaborators chosen at runtime from flags and configuration.

use crate::error::Result;
use docmatch_domain::traits::{
    Classification, ClassificationRequest, SemanticClassifier, TemplateRegistry, TextAnalysis,
    TextAnalyzer,
};
use docmatch_domain::{ExtractedDocument, TemplateDefinition};
use docmatch_llm::{HttpAnalyzer, HttpClassifier, LlmError, Offline};
use docmatch_resolver::{DocumentInput, FileRegistry, RegistryError, ResolutionRequest, StaticRegistry};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Template source: a file, or the built-in set.
#[derive(Debug)]
pub enum TemplateSource {
    /// Templates shipped with docmatch
    Builtin(StaticRegistry),
    /// Templates read from a file on every resolution
    File(FileRegistry),
}

impl TemplateSource {
    /// Open `path`, or the built-in set when no path is given.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                debug!("Using templates from {}", path.display());
                Ok(TemplateSource::File(FileRegistry::new(path)))
            }
            None => Ok(TemplateSource::Builtin(StaticRegistry::builtin()?)),
        }
    }
}

impl TemplateRegistry for TemplateSource {
    type Error = RegistryError;

    fn list_templates(&self) -> std::result::Result<Vec<TemplateDefinition>, Self::Error> {
        match self {
            TemplateSource::Builtin(registry) => registry.list_templates(),
            TemplateSource::File(registry) => registry.list_templates(),
        }
    }
}

/// Semantic classifier: remote when a URL is configured.
#[derive(Debug)]
pub enum Classifier {
    /// HTTP classifier service
    Remote(HttpClassifier),
    /// No classifier; the local fallback rules always run
    Offline(Offline),
}

impl Classifier {
    /// Connect to `url`, or run offline without one.
    pub fn connect(url: Option<&str>, timeout: Duration) -> Result<Self> {
        match url {
            Some(url) => {
                info!("Using classifier at {}", url);
                Ok(Classifier::Remote(HttpClassifier::with_timeout(url, timeout)?))
            }
            None => Ok(Classifier::Offline(Offline)),
        }
    }
}

impl SemanticClassifier for Classifier {
    type Error = LlmError;

    fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> std::result::Result<Classification, Self::Error> {
        match self {
            Classifier::Remote(client) => client.classify(request),
            Classifier::Offline(offline) => offline.classify(request),
        }
    }

    fn health_check(&self) -> bool {
        match self {
            Classifier::Remote(client) => client.health_check(),
            Classifier::Offline(offline) => SemanticClassifier::health_check(offline),
        }
    }
}

/// Entity/key-phrase analyzer: remote when a URL is configured.
#[derive(Debug)]
pub enum Analyzer {
    /// HTTP analyzer service
    Remote(HttpAnalyzer),
    /// No analyzer; the local regex analysis always runs
    Offline(Offline),
}

impl Analyzer {
    /// Connect to `url`, or run offline without one.
    pub fn connect(url: Option<&str>, timeout: Duration) -> Result<Self> {
        match url {
            Some(url) => {
                info!("Using analyzer at {}", url);
                Ok(Analyzer::Remote(HttpAnalyzer::with_timeout(url, timeout)?))
            }
            None => Ok(Analyzer::Offline(Offline)),
        }
    }
}

impl TextAnalyzer for Analyzer {
    type Error = LlmError;

    fn analyze(&self, text: &str) -> std::result::Result<TextAnalysis, Self::Error> {
        match self {
            Analyzer::Remote(client) => client.analyze(text),
            Analyzer::Offline(offline) => offline.analyze(text),
        }
    }

    fn health_check(&self) -> bool {
        match self {
            Analyzer::Remote(client) => client.health_check(),
            Analyzer::Offline(offline) => TextAnalyzer::health_check(offline),
        }
    }
}

/// Read a document file into a request.
///
/// `.json` files are passed through as raw payloads (an extracted document
/// when they carry `rawText`, a structured form otherwise); any other file is
/// plain text.
pub fn load_input(path: &Path) -> Result<ResolutionRequest> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let input = if is_json {
        DocumentInput::Raw(content)
    } else {
        DocumentInput::Document(ExtractedDocument::from_text(content))
    };
    Ok(ResolutionRequest::new(input).with_document_id(path.display().to_string()))
}
