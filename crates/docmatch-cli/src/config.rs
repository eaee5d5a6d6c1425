//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use docmatch_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Template file used when `--templates` is not given; built-in set otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,

    /// Remote collaborators
    #[serde(default)]
    pub services: Services,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Engine settings; defaults apply when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<ResolverConfig>,
}

/// Remote collaborator endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Services {
    /// Semantic classifier base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier_url: Option<String>,

    /// Entity/key-phrase analyzer base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer_url: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// Full resolution as JSON
    Json,
    /// Canonical export projection
    Export,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".docmatch").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        if let Some(resolver) = &config.resolver {
            resolver.validate().map_err(CliError::Config)?;
        }
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Engine settings in effect.
    pub fn resolver_config(&self) -> ResolverConfig {
        self.resolver.clone().unwrap_or_default()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert!(config.services.classifier_url.is_none());
        assert_eq!(config.resolver_config().max_retries, 0);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.templates.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.services.classifier_url = Some("http://localhost:9000".into());
        config.settings.format = OutputFormat::Export;
        config.resolver = Some(ResolverConfig::aggressive());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(
            loaded.services.classifier_url.as_deref(),
            Some("http://localhost:9000")
        );
        assert_eq!(loaded.settings.format, OutputFormat::Export);
        assert_eq!(loaded.resolver_config().classifier_timeout_ms, 1500);
    }

    #[test]
    fn test_invalid_resolver_section_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.resolver = Some(ResolverConfig {
            excerpt_chars: 0,
            ..ResolverConfig::default()
        });
        config.save_to(&path).unwrap();
        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }
}
