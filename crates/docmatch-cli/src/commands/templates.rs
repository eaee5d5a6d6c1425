//! Templates command implementation.

use crate::cli::TemplatesArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::services::TemplateSource;
use docmatch_domain::traits::TemplateRegistry;

/// Execute the templates command.
pub fn execute_templates(args: TemplatesArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let path = args.templates.as_deref().or(config.templates.as_deref());
    let templates = TemplateSource::open(path)?.list_templates()?;
    println!("{}", formatter.format_templates(&templates)?);
    Ok(())
}
