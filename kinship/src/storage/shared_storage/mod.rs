//! Shared Storage
//!
//! SurrealDB-backed implementation of every store trait in Kinship. One
//! `SharedStorage` instance serves users, sessions, posts, notifications,
//! time restrictions and any number of relationship collections.

use std::sync::Arc;

use surrealdb::Surreal;

use crate::storage::config::{SurrealDBAuth, SurrealDBAuthType, SurrealDBConfig, SurrealDBEngine};
use crate::storage::errors::StorageError;
use crate::storage::traits::SocialStore;

pub mod base;
pub mod config;
pub mod notification;
pub mod post;
pub mod relationship;
pub mod restriction;
pub mod schema;
pub mod session;
pub mod user;

pub use base::*;
pub use config::*;

/// Type alias for embedded shared storage
pub type EmbeddedSharedStorage = SharedStorage<surrealdb::engine::local::Db>;

/// Create an in-memory shared storage instance
pub async fn create_memory_shared_storage(
    config: SharedStorageConfig,
) -> Result<EmbeddedSharedStorage, StorageError> {
    let client = Surreal::new::<surrealdb::engine::local::Mem>(())
        .await
        .map_err(|e| StorageError::Connection(format!("Failed to create memory client: {}", e)))?;

    SharedStorage::new(client, config).await
}

/// Create an embedded shared storage instance backed by RocksDB
pub async fn create_embedded_shared_storage(
    path: &str,
    config: SharedStorageConfig,
) -> Result<EmbeddedSharedStorage, StorageError> {
    use surrealdb::engine::local::RocksDb;

    let client = Surreal::new::<RocksDb>(path).await.map_err(|e| {
        StorageError::Connection(format!("Failed to create embedded database: {}", e))
    })?;

    SharedStorage::new(client, config).await
}

/// Create a shared storage instance from configuration
pub async fn create_shared_store(
    config: &SurrealDBConfig,
) -> Result<Arc<dyn SocialStore>, StorageError> {
    let shared_config = SharedStorageConfig::from(config);

    match config.engine {
        SurrealDBEngine::Memory => {
            tracing::info!("Creating SharedStorage in-memory store");
            let store = create_memory_shared_storage(shared_config).await?;
            Ok(Arc::new(store))
        }
        SurrealDBEngine::RocksDB => {
            tracing::info!(
                "Creating SharedStorage RocksDB store at {}",
                config.connection
            );
            let store = create_embedded_shared_storage(&config.connection, shared_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "surrealdb-remote")]
        SurrealDBEngine::WebSocket => {
            tracing::info!(
                "Creating SharedStorage WebSocket connection to {}",
                config.connection
            );
            let client = Surreal::new::<surrealdb::engine::remote::ws::Ws>(&config.connection)
                .await
                .map_err(|e| {
                    StorageError::Connection(format!("Failed to create WebSocket client: {}", e))
                })?;

            if let Some(auth) = &config.auth {
                authenticate_client(&client, auth, config).await?;
            }

            let store = SharedStorage::new(client, shared_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "surrealdb-remote"))]
        SurrealDBEngine::WebSocket => Err(StorageError::Configuration(
            "WebSocket engine requires 'surrealdb-remote' feature to be enabled".to_string(),
        )),
        #[cfg(feature = "surrealdb-remote")]
        SurrealDBEngine::Http => {
            tracing::info!(
                "Creating SharedStorage HTTP connection to {}",
                config.connection
            );
            let client = Surreal::new::<surrealdb::engine::remote::http::Http>(&config.connection)
                .await
                .map_err(|e| {
                    StorageError::Connection(format!("Failed to create HTTP client: {}", e))
                })?;

            if let Some(auth) = &config.auth {
                authenticate_client(&client, auth, config).await?;
            }

            let store = SharedStorage::new(client, shared_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "surrealdb-remote"))]
        SurrealDBEngine::Http => Err(StorageError::Configuration(
            "HTTP engine requires 'surrealdb-remote' feature to be enabled".to_string(),
        )),
    }
}

/// Authenticate with SurrealDB client
pub async fn authenticate_client<C>(
    client: &Surreal<C>,
    auth: &SurrealDBAuth,
    config: &SurrealDBConfig,
) -> Result<(), StorageError>
where
    C: surrealdb::Connection,
{
    let (Some(username), Some(password)) = (&auth.username, &auth.password) else {
        return Err(StorageError::Authentication(
            "Username and password are required".to_string(),
        ));
    };

    match auth.auth_type {
        SurrealDBAuthType::Root => {
            tracing::debug!("Authenticating as root user");
            let root = surrealdb::opt::auth::Root { username, password };
            client
                .signin(root)
                .await
                .map_err(|e| StorageError::Authentication(format!("Root auth failed: {}", e)))?;
        }
        SurrealDBAuthType::Namespace => {
            tracing::debug!("Authenticating as namespace user");
            let ns_auth = surrealdb::opt::auth::Namespace {
                namespace: &config.namespace,
                username,
                password,
            };
            client.signin(ns_auth).await.map_err(|e| {
                StorageError::Authentication(format!("Namespace auth failed: {}", e))
            })?;
        }
        SurrealDBAuthType::Database => {
            tracing::debug!("Authenticating as database user");
            let db_auth = surrealdb::opt::auth::Database {
                namespace: &config.namespace,
                database: &config.database,
                username,
                password,
            };
            client.signin(db_auth).await.map_err(|e| {
                StorageError::Authentication(format!("Database auth failed: {}", e))
            })?;
        }
    }
    Ok(())
}

/// Map a failed write to a storage error, recognising uniqueness violations.
///
/// SurrealDB reports both a duplicate record id and a unique index hit only
/// through the error message.
pub(crate) fn write_error(context: &str, err: surrealdb::Error) -> StorageError {
    let message = err.to_string();
    if message.contains("already exists") || message.contains("already contains") {
        StorageError::AlreadyExists(format!("{}: {}", context, message))
    } else {
        StorageError::Query(format!("{}: {}", context, message))
    }
}

/// Build a `WHERE` clause from a list of conditions joined with AND
pub(crate) fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}
