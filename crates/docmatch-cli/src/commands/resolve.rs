//! Resolve command implementation.

use crate::cli::ResolveArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::services::{load_input, Analyzer, Classifier, TemplateSource};
use docmatch_resolver::{Resolver, ResolverConfig};
use tracing::debug;

/// Execute the resolve command.
///
/// The HTTP clients are blocking, so they are built before the runtime starts
/// and dropped after it has shut down.
pub fn execute_resolve(args: ResolveArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let resolver_config: ResolverConfig = args
        .preset
        .map(Into::into)
        .unwrap_or_else(|| config.resolver_config());

    let templates = TemplateSource::open(args.templates.as_deref().or(config.templates.as_deref()))?;
    let classifier = Classifier::connect(
        args.classifier_url
            .as_deref()
            .or(config.services.classifier_url.as_deref()),
        resolver_config.classifier_timeout(),
    )?;
    let analyzer = Analyzer::connect(
        args.analyzer_url
            .as_deref()
            .or(config.services.analyzer_url.as_deref()),
        resolver_config.analyzer_timeout(),
    )?;

    let requests = args
        .inputs
        .iter()
        .map(|path| load_input(path))
        .collect::<Result<Vec<_>>>()?;
    let sources: Vec<String> = args.inputs.iter().map(|p| p.display().to_string()).collect();
    debug!("Loaded {} documents", requests.len());

    let resolver = Resolver::new(templates, classifier, analyzer, resolver_config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let results = runtime.block_on(resolver.resolve_batch(requests));
    drop(runtime);

    let mut failures = 0;
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(resolution) => println!("{}", formatter.format_resolution(source, &resolution)?),
            Err(e) => {
                failures += 1;
                eprintln!("{}", formatter.error(&format!("{}: {}", source, e)));
            }
        }
    }

    if failures > 0 {
        return Err(CliError::InvalidInput(format!(
            "{} of {} documents could not be resolved",
            failures,
            sources.len()
        )));
    }
    Ok(())
}
