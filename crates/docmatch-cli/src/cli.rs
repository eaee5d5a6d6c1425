//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docmatch - Match documents to templates and extract their fields.
#[derive(Debug, Parser)]
#[command(name = "docmatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DOCMATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// Full resolution as JSON
    Json,
    /// Canonical export projection as JSON
    Export,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one or more documents against the templates
    Resolve(ResolveArgs),

    /// List the available templates
    Templates(TemplatesArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Document files (.json for structured or extracted documents, anything else as plain text)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Template file (.toml or .json); built-in templates when omitted
    #[arg(short, long)]
    pub templates: Option<PathBuf>,

    /// Semantic classifier base URL
    #[arg(long, env = "DOCMATCH_CLASSIFIER_URL")]
    pub classifier_url: Option<String>,

    /// Entity/key-phrase analyzer base URL
    #[arg(long, env = "DOCMATCH_ANALYZER_URL")]
    pub analyzer_url: Option<String>,

    /// Engine preset; overrides the [resolver] section of the config file
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,
}

/// Arguments for the templates command.
#[derive(Debug, Parser)]
pub struct TemplatesArgs {
    /// Template file (.toml or .json); built-in templates when omitted
    #[arg(short, long)]
    pub templates: Option<PathBuf>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the configuration in effect
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Engine preset argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PresetArg {
    /// Balanced timeouts, single attempt
    Default,
    /// Short timeouts for interactive use
    Aggressive,
    /// Long timeouts with retries
    Lenient,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Export => crate::config::OutputFormat::Export,
        }
    }
}

impl From<PresetArg> for docmatch_resolver::ResolverConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => docmatch_resolver::ResolverConfig::default(),
            PresetArg::Aggressive => docmatch_resolver::ResolverConfig::aggressive(),
            PresetArg::Lenient => docmatch_resolver::ResolverConfig::lenient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_command() {
        let cli = Cli::parse_from([
            "docmatch",
            "resolve",
            "leave.txt",
            "form.json",
            "--templates",
            "templates.toml",
            "--format",
            "export",
        ]);
        match cli.command {
            Command::Resolve(args) => {
                assert_eq!(args.inputs.len(), 2);
                assert_eq!(args.templates, Some(PathBuf::from("templates.toml")));
            }
            _ => panic!("Expected Resolve command"),
        }
        assert!(matches!(cli.format, Some(CliFormat::Export)));
    }

    #[test]
    fn test_resolve_requires_input() {
        assert!(Cli::try_parse_from(["docmatch", "resolve"]).is_err());
    }

    #[test]
    fn test_config_init_command() {
        let cli = Cli::parse_from(["docmatch", "config", "init", "--force"]);
        match cli.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { force },
            }) => assert!(force),
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_preset_conversion() {
        let config: docmatch_resolver::ResolverConfig = PresetArg::Lenient.into();
        assert_eq!(config.max_retries, 2);
    }
}
