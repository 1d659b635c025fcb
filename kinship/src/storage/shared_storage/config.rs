//! Configuration for shared storage

/// Configuration for the shared storage
#[derive(Debug, Clone)]
pub struct SharedStorageConfig {
    pub namespace: String,
    pub database: String,
}

impl Default for SharedStorageConfig {
    fn default() -> Self {
        Self {
            namespace: "kinship".to_string(),
            database: "main".to_string(),
        }
    }
}

impl From<&crate::storage::config::SurrealDBConfig> for SharedStorageConfig {
    fn from(config: &crate::storage::config::SurrealDBConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            database: config.database.clone(),
        }
    }
}
