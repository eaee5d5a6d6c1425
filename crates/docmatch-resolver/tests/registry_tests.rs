//! File-backed template registry tests

use docmatch_domain::traits::TemplateRegistry;
use docmatch_domain::FieldType;
use docmatch_llm::Offline;
use docmatch_resolver::{
    FileRegistry, RegistryError, ResolutionRequest, Resolver, ResolverConfig, ResolverError,
};
use std::fs;
use tempfile::TempDir;

const TRANSFER_TOML: &str = r#"
[[templates]]
id = "transfer_request"
name = "Transfer Request"
category = "posting"
keywords = ["transfer"]
expected_entity_types = ["Location"]

[[templates.fields]]
id = "current_station"
label = "Current Station"
type = "text"
required = true

[[templates.fields]]
id = "reasons"
label = "Reasons"
type = "list"
"#;

#[test]
fn test_toml_file_registry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("templates.toml");
    fs::write(&path, TRANSFER_TOML).unwrap();

    let registry = FileRegistry::new(&path);
    let templates = registry.list_templates().unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].fields[1].field_type, FieldType::List);
    assert!(templates[0].fields[0].required);
}

#[test]
fn test_json_file_registry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("templates.JSON");
    fs::write(
        &path,
        r#"{"templates": [{"id": "memo", "name": "Memo", "keywords": ["memo"],
            "fields": [{"id": "subject", "label": "Subject", "type": "text"}]}]}"#,
    )
    .unwrap();

    let templates = FileRegistry::new(&path).list_templates().unwrap();
    assert_eq!(templates[0].id, "memo");
    assert_eq!(templates[0].category, "");
}

#[test]
fn test_file_is_reread_on_every_call() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("templates.toml");
    fs::write(&path, TRANSFER_TOML).unwrap();
    let registry = FileRegistry::new(&path);
    assert_eq!(registry.list_templates().unwrap().len(), 1);

    fs::write(&path, "templates = []\n").unwrap();
    assert!(registry.list_templates().unwrap().is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let registry = FileRegistry::new(dir.path().join("absent.toml"));
    assert!(matches!(registry.list_templates(), Err(RegistryError::Io(_))));
}

#[test]
fn test_invalid_template_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("templates.toml");
    fs::write(
        &path,
        r#"
[[templates]]
id = "dup"
name = "Dup"

[[templates.fields]]
id = "a"
label = "A"
type = "text"

[[templates.fields]]
id = "a"
label = "A again"
type = "date"
"#,
    )
    .unwrap();
    assert!(matches!(
        FileRegistry::new(&path).list_templates(),
        Err(RegistryError::Invalid(_))
    ));
}

#[tokio::test]
async fn test_resolver_over_file_registry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("templates.toml");
    fs::write(&path, TRANSFER_TOML).unwrap();

    let resolver =
        Resolver::new(FileRegistry::new(&path), Offline, Offline, ResolverConfig::default()).unwrap();
    let request = ResolutionRequest::new(serde_json::json!({
        "subject": "transfer",
        "current_station": "Pune",
        "reasons": "spouse posted at Nagpur; children schooling"
    }));
    let resolution = resolver.resolve(request).await.unwrap();
    assert_eq!(resolution.template_id(), Some("transfer_request"));
    assert_eq!(resolution.fields.len(), 2);

    fs::remove_file(&path).unwrap();
    let result = resolver.resolve(ResolutionRequest::new(serde_json::json!({}))).await;
    assert!(matches!(result, Err(ResolverError::Registry(_))));
}
