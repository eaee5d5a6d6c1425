//! End-to-end command tests (offline collaborators, temporary files)

use docmatch_cli::cli::{ConfigAction, ConfigArgs, ResolveArgs, TemplatesArgs};
use docmatch_cli::commands::{execute_config, execute_resolve, execute_templates};
use docmatch_cli::config::OutputFormat;
use docmatch_cli::{CliError, Config, Formatter};
use std::fs;
use tempfile::TempDir;

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Json, false)
}

fn resolve_args(inputs: Vec<std::path::PathBuf>) -> ResolveArgs {
    ResolveArgs {
        inputs,
        templates: None,
        classifier_url: None,
        analyzer_url: None,
        preset: None,
    }
}

#[test]
fn test_resolve_text_and_json_documents() {
    let dir = TempDir::new().unwrap();
    let letter = dir.path().join("letter.txt");
    let form = dir.path().join("form.json");
    fs::write(&letter, "Application for earned leave from 01-02-2025").unwrap();
    fs::write(&form, r#"{"rawText": "sick leave, medical certificate attached"}"#).unwrap();

    let result = execute_resolve(resolve_args(vec![letter, form]), &Config::default(), &formatter());
    assert!(result.is_ok());
}

#[test]
fn test_resolve_missing_document() {
    let dir = TempDir::new().unwrap();
    let result = execute_resolve(
        resolve_args(vec![dir.path().join("absent.txt")]),
        &Config::default(),
        &formatter(),
    );
    assert!(matches!(result, Err(CliError::Io(_))));
}

#[test]
fn test_resolve_with_broken_template_file() {
    let dir = TempDir::new().unwrap();
    let letter = dir.path().join("letter.txt");
    fs::write(&letter, "earned leave").unwrap();

    let mut args = resolve_args(vec![letter]);
    args.templates = Some(dir.path().join("missing.toml"));
    let result = execute_resolve(args, &Config::default(), &formatter());
    assert!(matches!(result, Err(CliError::InvalidInput(_))));
}

#[test]
fn test_templates_from_config_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("templates.json");
    fs::write(&path, r#"[{"id": "memo", "name": "Memo"}]"#).unwrap();

    let config = Config {
        templates: Some(path),
        ..Config::default()
    };
    assert!(execute_templates(TemplatesArgs { templates: None }, &config, &formatter()).is_ok());
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let init = |force| ConfigArgs {
        action: ConfigAction::Init { force },
    };

    execute_config(init(false), &Config::default(), &path, &formatter()).unwrap();
    let written = Config::load_from(&path).unwrap();
    assert!(written.resolver.is_some());

    assert!(matches!(
        execute_config(init(false), &Config::default(), &path, &formatter()),
        Err(CliError::InvalidInput(_))
    ));
    assert!(execute_config(init(true), &Config::default(), &path, &formatter()).is_ok());
}
