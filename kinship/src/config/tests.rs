use crate::config::{
    ConfigBuilder, ConfigLoader, KinshipConfig, LogFormat, LogLevel, validation,
};
use crate::relationships::RelationshipCollections;
use crate::storage::config::SurrealDBEngine;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = KinshipConfig::default();
    assert_eq!(config.storage.surrealdb.engine, SurrealDBEngine::Memory);
    assert_eq!(config.logging.level, LogLevel::Info);
    assert_eq!(config.relationships.follow, RelationshipCollections::follow());
    assert_eq!(config.relationships.monitor, RelationshipCollections::monitor());
    assert!(validation::validate_config(&config).is_ok());
}

#[test]
fn test_builder_with_data_dir() {
    let config = ConfigBuilder::new()
        .with_data_dir("/tmp/kinship_data")
        .with_default_storage()
        .with_log_level(LogLevel::Debug)
        .build()
        .unwrap();

    assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/kinship_data"));
    assert_eq!(config.storage.surrealdb.engine, SurrealDBEngine::RocksDB);
    assert!(config.storage.surrealdb.connection.starts_with("/tmp/kinship_data"));
    assert_eq!(config.logging.level, LogLevel::Debug);
}

#[test]
fn test_predefined_configs() {
    let dev = ConfigBuilder::development().build().unwrap();
    assert_eq!(dev.storage.surrealdb.engine, SurrealDBEngine::Memory);
    assert_eq!(dev.logging.level, LogLevel::Debug);

    let test = ConfigBuilder::testing().build().unwrap();
    assert_eq!(test.storage.data_dir, PathBuf::from("./test_data"));

    let prod = ConfigBuilder::production().build().unwrap();
    assert_eq!(prod.storage.surrealdb.engine, SurrealDBEngine::RocksDB);
    assert_eq!(prod.logging.format, LogFormat::Json);
}

#[test]
fn test_shared_collection_names_are_rejected() {
    let result = ConfigBuilder::development()
        .with_monitor_collections(RelationshipCollections::new(
            "Monitor",
            "follow_relations",
            "monitor_requests",
        ))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_invalid_collection_name_is_rejected() {
    let result = ConfigBuilder::development()
        .with_follow_collections(RelationshipCollections::new(
            "Follow",
            "follow relations",
            "follow_requests",
        ))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_empty_namespace_is_rejected() {
    let result = ConfigBuilder::development().with_database("", "main").build();
    assert!(result.is_err());
}

#[test]
fn test_loader_reads_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kinship.toml");
    std::fs::write(
        &path,
        r#"
[logging]
level = "warn"
format = "compact"

[relationships.follow]
kind = "Follow"
relations = "followers"
requests = "follower_requests"
"#,
    )
    .unwrap();

    let mut loader = ConfigLoader::new();
    loader.load_file(&path).unwrap();
    let config = loader.extract().unwrap();

    assert_eq!(config.logging.level, LogLevel::Warn);
    assert_eq!(config.logging.format, LogFormat::Compact);
    assert_eq!(config.relationships.follow.relations, "followers");
    assert_eq!(config.relationships.monitor, RelationshipCollections::monitor());
}

#[test]
fn test_loader_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kinship.ini");
    std::fs::write(&path, "level = debug").unwrap();

    let mut loader = ConfigLoader::new();
    assert!(loader.load_file(&path).is_err());
    assert!(loader.load_file(dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_config_serialization() {
    let config = ConfigBuilder::new()
        .with_data_dir("/tmp/kinship_data")
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: KinshipConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(config.storage.data_dir, deserialized.storage.data_dir);
    assert_eq!(config.relationships, deserialized.relationships);
}

#[test]
fn test_loader_layers_file_over_custom_defaults() {
    let defaults = ConfigBuilder::new()
        .with_log_file("/tmp/kinship.log")
        .with_log_level(LogLevel::Error)
        .build()
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kinship.yaml");
    std::fs::write(&path, "logging:\n  level: debug\n").unwrap();

    let mut loader = ConfigLoader::with_defaults(defaults);
    loader.load_file(&path).unwrap();
    let config = loader.extract().unwrap();

    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/kinship.log")));
}

#[test]
fn test_builder_from_existing_config() {
    let base = ConfigBuilder::development().build().unwrap();
    let config = ConfigBuilder::from_config(base.clone())
        .with_log_format(LogFormat::Pretty)
        .build()
        .unwrap();

    assert_eq!(config.storage.surrealdb.engine, base.storage.surrealdb.engine);
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}
