//! Tests for configuration validation

use std::collections::BTreeMap;

use lockable_resources::config::{PoolConfig, ResourceConfig};

fn resource(name: &str, labels: &[&str]) -> ResourceConfig {
    ResourceConfig {
        name: name.to_string(),
        description: String::new(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        attributes: BTreeMap::new(),
    }
}

#[test]
fn test_pool_config_validation() {
    let valid = PoolConfig {
        resources: vec![resource("A", &["gpu"]), resource("B", &[])],
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_pool_config_empty() {
    let config = PoolConfig { resources: vec![] };
    assert!(config.validate().is_err());
}

#[test]
fn test_pool_config_duplicate_names() {
    let config = PoolConfig {
        resources: vec![resource("A", &[]), resource("A", &["gpu"])],
    };
    assert_eq!(
        config.validate().unwrap_err(),
        "resource `A` defined twice"
    );
}

#[test]
fn test_resource_config_whitespace() {
    assert!(resource("two words", &[]).validate().is_err());
    assert!(resource("  ", &[]).validate().is_err());
    assert!(resource("A", &["gpu fast"]).validate().is_err());
    assert!(resource("A", &[""]).validate().is_err());
}

#[test]
fn test_pool_config_from_json() {
    let json = r#"{
        "resources": [
            { "name": "printer-1", "labels": ["printer", "color"] },
            {
                "name": "node-1",
                "description": "build node",
                "labels": ["node"],
                "attributes": { "os": "linux" }
            }
        ]
    }"#;

    let config = PoolConfig::from_json_str(json).unwrap();
    assert_eq!(config.resources.len(), 2);

    let resources = config.to_resources();
    assert!(resources[0].has_label("color"));
    assert_eq!(resources[1].attributes.get("os").map(String::as_str), Some("linux"));
    assert_eq!(resources[1].description, "build node");
    assert!(resources.iter().all(|r| r.is_free()));
}

#[test]
fn test_pool_config_from_bad_json() {
    assert!(PoolConfig::from_json_str("{").unwrap_err().starts_with("parse error"));
}

#[test]
fn test_pool_config_from_path() {
    let path = std::env::temp_dir().join(format!(
        "lockable-resources-config-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, r#"{ "resources": [ { "name": "A" } ] }"#).unwrap();

    let config = PoolConfig::from_path(&path).unwrap();
    assert_eq!(config.resources[0].name, "A");

    std::fs::remove_file(&path).unwrap();
    assert!(PoolConfig::from_path(&path).is_err());
}
