//! Configuration structures for the SurrealDB backend

use serde::{Deserialize, Serialize};

use crate::storage::errors::StorageError;

/// SurrealDB configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurrealDBConfig {
    /// SurrealDB engine type
    pub engine: SurrealDBEngine,

    /// Connection string for remote or path for embedded
    pub connection: String,

    /// Namespace
    pub namespace: String,

    /// Database name
    pub database: String,

    /// Authentication information
    pub auth: Option<SurrealDBAuth>,
}

/// SurrealDB engine types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SurrealDBEngine {
    /// In-memory storage (for testing)
    Memory,
    /// RocksDB on-disk storage (embedded)
    RocksDB,
    /// Remote WebSocket connection
    WebSocket,
    /// Remote HTTP connection
    Http,
}

/// SurrealDB authentication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurrealDBAuth {
    /// Authentication type
    pub auth_type: SurrealDBAuthType,

    /// Username (for root/namespace/database auth)
    pub username: Option<String>,

    /// Password (for root/namespace/database auth)
    pub password: Option<String>,
}

/// SurrealDB authentication types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SurrealDBAuthType {
    /// Root user authentication
    Root,
    /// Namespace user authentication
    Namespace,
    /// Database user authentication
    Database,
}

impl SurrealDBConfig {
    /// Validate the connection settings
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.engine != SurrealDBEngine::Memory && self.connection.is_empty() {
            return Err(StorageError::Configuration(
                "SurrealDB connection string cannot be empty".to_string(),
            ));
        }
        if self.namespace.is_empty() {
            return Err(StorageError::Configuration(
                "SurrealDB namespace cannot be empty".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(StorageError::Configuration(
                "SurrealDB database cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SurrealDBConfig {
    fn default() -> Self {
        Self {
            engine: SurrealDBEngine::Memory,
            connection: "memory".to_string(),
            namespace: "kinship".to_string(),
            database: "main".to_string(),
            auth: None,
        }
    }
}
