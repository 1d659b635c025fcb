//! Configuration validation.

use super::ConfigError;
use super::models::*;
use crate::relationships::RelationshipCollections;
use crate::storage::config::SurrealDBEngine;
use crate::storage::shared_storage::schema::validate_collection_name;

/// Validate the entire configuration.
pub fn validate_config(config: &KinshipConfig) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_relationships_config(&config.relationships)?;
    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Data directory cannot be empty".to_string(),
        ));
    }

    config
        .surrealdb
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    if matches!(
        config.surrealdb.engine,
        SurrealDBEngine::WebSocket | SurrealDBEngine::Http
    ) && !config.surrealdb.connection.contains("://")
    {
        return Err(ConfigError::ValidationError(format!(
            "Remote SurrealDB connection must be a URL, got '{}'",
            config.surrealdb.connection
        )));
    }

    Ok(())
}

fn validate_relationships_config(config: &RelationshipsConfig) -> Result<(), ConfigError> {
    validate_collections(&config.follow)?;
    validate_collections(&config.monitor)?;

    let mut names = vec![
        &config.follow.relations,
        &config.follow.requests,
        &config.monitor.relations,
        &config.monitor.requests,
    ];
    names.sort();
    names.dedup();
    if names.len() != 4 {
        return Err(ConfigError::ValidationError(
            "Every relationship collection needs a distinct name".to_string(),
        ));
    }

    Ok(())
}

fn validate_collections(collections: &RelationshipCollections) -> Result<(), ConfigError> {
    if collections.kind.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Relationship kind cannot be empty".to_string(),
        ));
    }

    for name in [&collections.relations, &collections.requests] {
        validate_collection_name(name).map_err(|e| {
            ConfigError::ValidationError(format!("{} collections: {}", collections.kind, e))
        })?;
    }

    Ok(())
}
