//! Storage abstractions and implementations
//!
//! Trait definitions for every persisted collection in Kinship, plus the
//! SurrealDB-backed `SharedStorage` that implements all of them.
//!
//! Relationship kinds (follow, monitor, ...) do not get their own store type:
//! `RelationStore` and `RequestStore` take the collection name on every call.

pub mod config;
pub mod errors;
pub mod filters;
pub mod models;
pub mod shared_storage;
pub mod traits;

use std::sync::Arc;

// Re-export common types for convenience
pub use config::{SurrealDBAuth, SurrealDBAuthType, SurrealDBConfig, SurrealDBEngine};
pub use errors::{StorageError, StorageResult};
pub use filters::{NotificationFilter, PostFilter, RelationFilter, RequestFilter};
pub use models::{
    Notification, NotificationStatus, Post, PostOptions, Relation, RelationRequest,
    RequestStatus, ScreenTime, Session, TimeRestriction, User,
};
pub use shared_storage::{
    EmbeddedSharedStorage, SharedStorage, SharedStorageConfig, create_embedded_shared_storage,
    create_memory_shared_storage,
};
pub use traits::{
    BaseStore, NotificationStore, PostStore, RelationStore, RelationshipStore, RequestStore,
    RestrictionStore, ScreenTimeStore, SessionStore, SocialStore, UserStore,
};

/// Create the storage service described by the configuration
pub async fn create_storage_service(
    config: &crate::config::KinshipConfig,
) -> Result<Arc<dyn SocialStore>, StorageError> {
    let surreal_config = &config.storage.surrealdb;
    surreal_config.validate()?;

    if surreal_config.engine == SurrealDBEngine::RocksDB {
        let path = std::path::Path::new(&surreal_config.connection);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let store = shared_storage::create_shared_store(surreal_config).await?;

    if !store.health_check().await? {
        return Err(StorageError::Connection(
            "Storage failed its health check".to_string(),
        ));
    }

    Ok(store)
}
