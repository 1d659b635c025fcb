//! Base shared storage implementation

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use surrealdb::{Connection, Surreal};
use tokio::sync::RwLock;

use super::config::SharedStorageConfig;
use super::schema;
use crate::storage::errors::StorageError;
use crate::storage::traits::BaseStore;

/// Main shared storage manager
#[derive(Debug, Clone)]
pub struct SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    pub(crate) client: Surreal<C>,
    pub(crate) config: SharedStorageConfig,
    /// Relationship collections prepared on this connection
    pub(crate) collections: Arc<RwLock<BTreeSet<String>>>,
}

impl<C> SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Create a new shared storage instance
    pub async fn new(
        client: Surreal<C>,
        config: SharedStorageConfig,
    ) -> Result<Self, StorageError> {
        client
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to set namespace/database: {}", e))
            })?;

        let storage = Self {
            client,
            config,
            collections: Arc::new(RwLock::new(BTreeSet::new())),
        };

        storage.initialize_schema().await?;

        Ok(storage)
    }

    /// Initialize the database schema with all fixed tables
    async fn initialize_schema(&self) -> Result<(), StorageError> {
        schema::initialize_schema(&self.client).await
    }

    /// Define a relationship collection once per connection
    pub(crate) async fn ensure_collection(
        &self,
        collection: &str,
        unique_pair: bool,
    ) -> Result<(), StorageError> {
        schema::validate_collection_name(collection)?;

        if self.collections.read().await.contains(collection) {
            return Ok(());
        }

        schema::define_relationship_collection(&self.client, collection, unique_pair).await?;
        self.collections
            .write()
            .await
            .insert(collection.to_string());

        tracing::debug!("Prepared collection {}", collection);
        Ok(())
    }

    /// Get the underlying client for advanced operations
    pub fn client(&self) -> &Surreal<C> {
        &self.client
    }
}

#[async_trait]
impl<C> BaseStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn health_check(&self) -> Result<bool, StorageError> {
        let _result = self
            .client
            .query("INFO FOR DB")
            .await
            .map_err(|e| StorageError::Connection(format!("Health check failed: {}", e)))?;

        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut tables: Vec<String> = schema::FIXED_TABLES.iter().map(|t| t.to_string()).collect();
        tables.extend(self.collections.read().await.iter().cloned());

        for table in tables {
            self.client
                .query("DELETE FROM type::table($table)")
                .bind(("table", table))
                .await
                .map_err(|e| StorageError::Query(format!("Failed to clear table: {}", e)))?
                .check()
                .map_err(|e| StorageError::Query(format!("Failed to clear table: {}", e)))?;
        }

        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        let collections: Vec<String> = self.collections.read().await.iter().cloned().collect();
        Ok(serde_json::json!({
            "type": "shared_storage",
            "namespace": self.config.namespace,
            "database": self.config.database,
            "tables": schema::FIXED_TABLES,
            "relationship_collections": collections,
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        // SurrealDB connections are automatically closed when dropped
        Ok(())
    }
}
