//! Error types for the resolver

use thiserror::Error;

/// Unrecoverable errors of a single resolution
///
/// Data-quality problems never surface here; they are absorbed and recorded
/// as diagnostics on the resolution.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// The template registry itself failed
    #[error("Registry error: {0}")]
    Registry(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A background task could not be joined
    #[error("Task error: {0}")]
    Task(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ResolverError {
    fn from(e: serde_json::Error) -> Self {
        ResolverError::Serialization(e.to_string())
    }
}

/// Errors raised while loading templates
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Template file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Template file could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A template violates a structural invariant
    #[error("Invalid template: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for RegistryError {
    fn from(e: toml::de::Error) -> Self {
        RegistryError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Parse(e.to_string())
    }
}
