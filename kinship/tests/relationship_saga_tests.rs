//! Rollback of multi-step relationship operations when a write fails

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kinship::relationships::{
    RelationshipCollections, RelationshipError, RelationshipManager, RequestState,
};
use kinship::storage::{
    BaseStore, EmbeddedSharedStorage, Relation, RelationFilter, RelationRequest, RelationStore,
    RequestFilter, RequestStatus, RequestStore, SharedStorageConfig, StorageError,
    create_memory_shared_storage,
};

/// Delegates to an in-memory store and fails the writes that are switched on
#[derive(Debug)]
struct FaultyStore {
    inner: EmbeddedSharedStorage,
    fail_relation_create: AtomicBool,
    fail_relation_remove: AtomicBool,
    fail_pending_create: AtomicBool,
    fail_terminal_create: AtomicBool,
    fail_accepted_remove: AtomicBool,
}

impl FaultyStore {
    async fn new() -> Arc<Self> {
        let inner = create_memory_shared_storage(SharedStorageConfig::default())
            .await
            .expect("Failed to create test storage");
        Arc::new(Self {
            inner,
            fail_relation_create: AtomicBool::new(false),
            fail_relation_remove: AtomicBool::new(false),
            fail_pending_create: AtomicBool::new(false),
            fail_terminal_create: AtomicBool::new(false),
            fail_accepted_remove: AtomicBool::new(false),
        })
    }

    fn check(flag: &AtomicBool) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Query("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseStore for FaultyStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        self.inner.health_check().await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.inner.clear().await
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        self.inner.get_metadata().await
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.inner.close().await
    }
}

#[async_trait]
impl RelationStore for FaultyStore {
    async fn prepare_relation_collection(&self, collection: &str) -> Result<(), StorageError> {
        self.inner.prepare_relation_collection(collection).await
    }

    async fn create_relation(
        &self,
        collection: &str,
        relation: Relation,
    ) -> Result<Relation, StorageError> {
        Self::check(&self.fail_relation_create)?;
        self.inner.create_relation(collection, relation).await
    }

    async fn find_relation(
        &self,
        collection: &str,
        filter: RelationFilter,
    ) -> Result<Option<Relation>, StorageError> {
        self.inner.find_relation(collection, filter).await
    }

    async fn list_relations(
        &self,
        collection: &str,
        filter: RelationFilter,
    ) -> Result<Vec<Relation>, StorageError> {
        self.inner.list_relations(collection, filter).await
    }

    async fn remove_relation(
        &self,
        collection: &str,
        filter: RelationFilter,
    ) -> Result<Option<Relation>, StorageError> {
        Self::check(&self.fail_relation_remove)?;
        self.inner.remove_relation(collection, filter).await
    }
}

#[async_trait]
impl RequestStore for FaultyStore {
    async fn prepare_request_collection(&self, collection: &str) -> Result<(), StorageError> {
        self.inner.prepare_request_collection(collection).await
    }

    async fn create_request(
        &self,
        collection: &str,
        request: RelationRequest,
    ) -> Result<RelationRequest, StorageError> {
        match request.status {
            RequestStatus::Pending => Self::check(&self.fail_pending_create)?,
            _ => Self::check(&self.fail_terminal_create)?,
        }
        self.inner.create_request(collection, request).await
    }

    async fn find_request(
        &self,
        collection: &str,
        filter: RequestFilter,
    ) -> Result<Option<RelationRequest>, StorageError> {
        self.inner.find_request(collection, filter).await
    }

    async fn list_requests(
        &self,
        collection: &str,
        filter: RequestFilter,
    ) -> Result<Vec<RelationRequest>, StorageError> {
        self.inner.list_requests(collection, filter).await
    }

    async fn remove_request(
        &self,
        collection: &str,
        filter: RequestFilter,
    ) -> Result<Option<RelationRequest>, StorageError> {
        if filter.status == Some(RequestStatus::Accepted) {
            Self::check(&self.fail_accepted_remove)?;
        }
        self.inner.remove_request(collection, filter).await
    }
}

async fn setup() -> (Arc<FaultyStore>, RelationshipManager) {
    let store = FaultyStore::new().await;
    let manager = RelationshipManager::new(store.clone(), RelationshipCollections::follow())
        .await
        .expect("Failed to create manager");
    manager.send_request("alice", "bob").await.unwrap();
    (store, manager)
}

#[tokio::test]
async fn test_accept_restores_pending_when_relation_fails() {
    let (store, follow) = setup().await;
    store.fail_relation_create.store(true, Ordering::SeqCst);

    let err = follow.accept_request("alice", "bob").await.unwrap_err();
    assert!(matches!(err, RelationshipError::Storage { .. }));

    assert_eq!(
        follow.request_state("alice", "bob").await.unwrap(),
        RequestState::Pending
    );
    assert!(follow.get_relations("bob").await.unwrap().is_empty());

    store.fail_relation_create.store(false, Ordering::SeqCst);
    follow.accept_request("alice", "bob").await.unwrap();
}

#[tokio::test]
async fn test_accept_rolls_back_relation_when_history_fails() {
    let (store, follow) = setup().await;
    store.fail_terminal_create.store(true, Ordering::SeqCst);

    let err = follow.accept_request("alice", "bob").await.unwrap_err();
    assert!(matches!(err, RelationshipError::Storage { .. }));

    assert!(follow.get_relations("bob").await.unwrap().is_empty());
    follow.ensure_requested("alice", "bob").await.unwrap();
    let requests = follow.get_requests("alice").await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_accept_reports_partial_failure() {
    let (store, follow) = setup().await;
    store.fail_terminal_create.store(true, Ordering::SeqCst);
    store.fail_relation_remove.store(true, Ordering::SeqCst);

    let err = follow.accept_request("alice", "bob").await.unwrap_err();
    match &err {
        RelationshipError::PartialFailure {
            operation,
            compensation,
            ..
        } => {
            assert_eq!(*operation, "accept");
            assert!(compensation.contains("relation not removed"));
        }
        other => panic!("Expected PartialFailure, got {other:?}"),
    }
    assert_eq!(err.code(), "partial_failure");
}

#[tokio::test]
async fn test_reject_restores_pending() {
    let (store, follow) = setup().await;
    store.fail_terminal_create.store(true, Ordering::SeqCst);

    let err = follow.reject_request("alice", "bob").await.unwrap_err();
    assert!(matches!(err, RelationshipError::Storage { .. }));
    assert_eq!(
        follow.request_state("alice", "bob").await.unwrap(),
        RequestState::Pending
    );
}

#[tokio::test]
async fn test_reject_reports_partial_failure_when_restore_fails() {
    let (store, follow) = setup().await;
    store.fail_terminal_create.store(true, Ordering::SeqCst);
    store.fail_pending_create.store(true, Ordering::SeqCst);

    let err = follow.reject_request("alice", "bob").await.unwrap_err();
    assert!(matches!(err, RelationshipError::PartialFailure { .. }));
    assert_eq!(
        follow.request_state("alice", "bob").await.unwrap(),
        RequestState::None
    );
}

#[tokio::test]
async fn test_remove_relation_restores_relation_when_purge_fails() {
    let (store, follow) = setup().await;
    follow.accept_request("alice", "bob").await.unwrap();
    store.fail_accepted_remove.store(true, Ordering::SeqCst);

    let err = follow.remove_relation("bob", "alice").await.unwrap_err();
    assert!(matches!(err, RelationshipError::Storage { .. }));
    follow.ensure_related("bob", "alice").await.unwrap();
    assert_eq!(
        follow.request_state("alice", "bob").await.unwrap(),
        RequestState::Accepted
    );

    store.fail_accepted_remove.store(false, Ordering::SeqCst);
    follow.remove_relation("bob", "alice").await.unwrap();
    follow.ensure_not_related("bob", "alice").await.unwrap();
}
