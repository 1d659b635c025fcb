//! Configuration builder.

use super::{Result, models::*, validation};
use crate::relationships::RelationshipCollections;
use crate::storage::config::{SurrealDBAuth, SurrealDBAuthType, SurrealDBConfig, SurrealDBEngine};
use std::path::{Path, PathBuf};

/// Builder for creating KinshipConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: KinshipConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: KinshipConfig::default(),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: KinshipConfig) -> Self {
        Self { config }
    }

    /// Set the base data directory.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Persist to an embedded RocksDB database under the data directory
    pub fn with_default_storage(mut self) -> Self {
        if self.config.storage.data_dir == PathBuf::from("./data") {
            let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            self.config.storage.data_dir = home_dir.join(".kinship").join("data");
        }

        self.config.storage.surrealdb = SurrealDBConfig {
            engine: SurrealDBEngine::RocksDB,
            connection: self
                .config
                .storage
                .data_dir
                .join("db")
                .to_string_lossy()
                .to_string(),
            namespace: "kinship".to_string(),
            database: "main".to_string(),
            auth: None,
        };

        self
    }

    /// Use in-memory storage (good for testing)
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.surrealdb.engine = SurrealDBEngine::Memory;
        self.config.storage.surrealdb.connection = "memory".to_string();
        self
    }

    /// Set the SurrealDB namespace and database
    pub fn with_database(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.config.storage.surrealdb.namespace = namespace.into();
        self.config.storage.surrealdb.database = database.into();
        self
    }

    /// Set the collections backing follow relationships
    pub fn with_follow_collections(mut self, collections: RelationshipCollections) -> Self {
        self.config.relationships.follow = collections;
        self
    }

    /// Set the collections backing monitor relationships
    pub fn with_monitor_collections(mut self, collections: RelationshipCollections) -> Self {
        self.config.relationships.monitor = collections;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Development setup: in-memory storage and debug logging
    pub fn development() -> Self {
        Self::new()
            .with_memory_storage()
            .with_log_level(LogLevel::Debug)
    }

    /// Testing setup: in-memory storage with a throwaway data directory
    pub fn testing() -> Self {
        Self::development().with_data_dir(PathBuf::from("./test_data"))
    }

    /// Production setup: persistent storage and JSON logs
    pub fn production() -> Self {
        Self::new()
            .with_default_storage()
            .with_log_level(LogLevel::Info)
            .with_log_format(LogFormat::Json)
    }

    /// Production defaults, switched to a remote SurrealDB when one is configured
    pub fn defaults() -> Self {
        Self::production().with_remote_surrealdb_if_configured()
    }

    /// Configure SurrealDB to use a remote connection if `SURREALDB_URL` is set
    pub fn with_remote_surrealdb_if_configured(mut self) -> Self {
        if let Ok(connection_url) = std::env::var("SURREALDB_URL") {
            tracing::info!(
                "Configuring SurrealDB remote connection to: {}",
                connection_url
            );

            let engine =
                if connection_url.starts_with("ws://") || connection_url.starts_with("wss://") {
                    SurrealDBEngine::WebSocket
                } else {
                    SurrealDBEngine::Http
                };

            let namespace =
                std::env::var("SURREALDB_NAMESPACE").unwrap_or_else(|_| "kinship".to_string());
            let database =
                std::env::var("SURREALDB_DATABASE").unwrap_or_else(|_| "main".to_string());

            let auth = match (
                std::env::var("SURREALDB_USERNAME"),
                std::env::var("SURREALDB_PASSWORD"),
            ) {
                (Ok(username), Ok(password)) => Some(SurrealDBAuth {
                    auth_type: SurrealDBAuthType::Root,
                    username: Some(username),
                    password: Some(password),
                }),
                _ => None,
            };

            self.config.storage.surrealdb = SurrealDBConfig {
                engine,
                connection: connection_url,
                namespace,
                database,
                auth,
            };
        }

        self
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<KinshipConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
