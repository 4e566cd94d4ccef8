// Catalogs and configuration loaded from YAML files and the environment
use std::io::Write;
use std::sync::Arc;

use cyphercraft::query_builder::{node, qual};
use cyphercraft::{BuilderConfig, CatalogError, Client, EntityCategory, TypeCatalog};
use serial_test::serial;
use tempfile::NamedTempFile;

use super::fixtures::{Knows, Person};

const CATALOG_YAML: &str = r#"
types:
  - type_name: Person
    category: node
    label: Person
    properties:
      name: name
      last_seen: lastSeen
  - type_name: Knows
    category: relationship
    label: KNOWS
"#;

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_catalog_from_config_path() {
    let file = yaml_file(CATALOG_YAML);
    let config = BuilderConfig {
        catalog_path: Some(file.path().display().to_string()),
        ..Default::default()
    };
    let catalog = TypeCatalog::from_config(&config).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(
        catalog.describe("Knows").unwrap().category,
        EntityCategory::Relationship
    );
}

#[test]
fn test_yaml_catalog_drives_compilation() {
    let file = yaml_file(CATALOG_YAML);
    let catalog = Arc::new(TypeCatalog::from_yaml_file(file.path()).unwrap());
    let mut client = Client::new(catalog);
    let person = client.entity::<Person>().unwrap();
    let knows = client.type_value::<Knows>().unwrap();
    let compiled = client
        .match_(node(qual(&person, "p").unwrap()).to(knows, ()))
        .return_([person.field("last_seen").unwrap()])
        .compile()
        .unwrap();
    assert_eq!(
        compiled.cypher,
        "MATCH (p:Person)-[:KNOWS]->()\nRETURN p.lastSeen"
    );
}

#[test]
fn test_missing_catalog_file() {
    let config = BuilderConfig {
        catalog_path: Some("/nonexistent/catalog.yaml".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        TypeCatalog::from_config(&config),
        Err(CatalogError::ConfigRead { .. })
    ));
}

#[test]
fn test_builder_config_from_yaml() {
    let file = yaml_file("max_nesting_depth: 4\nlog_compiled_queries: true\n");
    let config = BuilderConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.max_nesting_depth, 4);
    assert!(config.log_compiled_queries);
    assert!(config.catalog_path.is_none());
}

#[test]
fn test_builder_config_from_yaml_rejects_invalid_depth() {
    let file = yaml_file("max_nesting_depth: 100\n");
    assert!(BuilderConfig::from_yaml_file(file.path()).is_err());
}

#[test]
#[serial]
fn test_env_catalog_round_trip() {
    let file = yaml_file(CATALOG_YAML);
    std::env::set_var("CYPHERCRAFT_CATALOG", file.path());
    let config = BuilderConfig::from_env().unwrap();
    std::env::remove_var("CYPHERCRAFT_CATALOG");

    let catalog = TypeCatalog::from_config(&config).unwrap();
    assert!(catalog.contains("Person"));
}
