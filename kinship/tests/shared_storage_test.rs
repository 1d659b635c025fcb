//! Integration tests for the SurrealDB-backed SharedStorage

use chrono::Utc;
use kinship::storage::{
    BaseStore, EmbeddedSharedStorage, NotificationFilter, NotificationStatus, NotificationStore,
    Notification, Relation, RelationFilter, RelationRequest, RelationStore, RequestFilter,
    RequestStatus, RequestStore, SharedStorageConfig, StorageError, User, UserStore,
    create_embedded_shared_storage, create_memory_shared_storage,
};

async fn create_test_storage() -> EmbeddedSharedStorage {
    let config = SharedStorageConfig {
        namespace: "test".to_string(),
        database: "kinship_test".to_string(),
    };
    create_memory_shared_storage(config)
        .await
        .expect("Failed to create test storage")
}

fn user(id: &str, username: &str) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        password_hash: "hash".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn request(id: &str, from: &str, to: &str, status: RequestStatus) -> RelationRequest {
    RelationRequest {
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        status,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_health_and_metadata() {
    let storage = create_test_storage().await;

    assert!(storage.health_check().await.unwrap());

    storage.prepare_relation_collection("follow_relations").await.unwrap();
    let metadata = storage.get_metadata().await.unwrap();
    assert_eq!(metadata["type"], "shared_storage");
    assert_eq!(metadata["namespace"], "test");
    assert_eq!(metadata["database"], "kinship_test");
    assert_eq!(metadata["relationship_collections"][0], "follow_relations");
}

#[tokio::test]
async fn test_usernames_are_unique() {
    let storage = create_test_storage().await;

    storage.create_user(user("u1", "alice")).await.unwrap();
    let err = storage.create_user(user("u2", "alice")).await.unwrap_err();
    assert!(matches!(err, StorageError::AlreadyExists(_)));

    let err = storage.create_user(user("u1", "alicia")).await.unwrap_err();
    assert!(matches!(err, StorageError::AlreadyExists(_)));

    let found = storage.get_user_by_username("alice").await.unwrap().unwrap();
    assert_eq!(found.id, "u1");
    assert!(storage.get_user("u2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_relation_keys_reject_duplicates() {
    let storage = create_test_storage().await;
    storage.prepare_relation_collection("follow_relations").await.unwrap();

    let relation = Relation {
        id: "bob_alice".to_string(),
        from: "bob".to_string(),
        to: "alice".to_string(),
        created_at: Utc::now(),
    };
    storage
        .create_relation("follow_relations", relation.clone())
        .await
        .unwrap();
    let err = storage
        .create_relation("follow_relations", relation)
        .await
        .unwrap_err();
    assert!(err.is_already_exists());

    let found = storage
        .find_relation("follow_relations", RelationFilter::pair("bob", "alice"))
        .await
        .unwrap();
    assert!(found.is_some());
    assert!(
        storage
            .find_relation("follow_relations", RelationFilter::pair("alice", "bob"))
            .await
            .unwrap()
            .is_none()
    );

    let involving = storage
        .list_relations("follow_relations", RelationFilter::involving("alice"))
        .await
        .unwrap();
    assert_eq!(involving.len(), 1);

    let removed = storage
        .remove_relation("follow_relations", RelationFilter::pair("bob", "alice"))
        .await
        .unwrap();
    assert!(removed.is_some());
    let removed = storage
        .remove_relation("follow_relations", RelationFilter::pair("bob", "alice"))
        .await
        .unwrap();
    assert!(removed.is_none());
}

#[tokio::test]
async fn test_request_queries() {
    let storage = create_test_storage().await;
    let collection = "follow_requests";
    storage.prepare_request_collection(collection).await.unwrap();

    storage
        .create_request(collection, request("r1", "alice", "bob", RequestStatus::Rejected))
        .await
        .unwrap();
    storage
        .create_request(collection, request("r2", "alice", "bob", RequestStatus::Pending))
        .await
        .unwrap();
    storage
        .create_request(collection, request("r3", "carol", "alice", RequestStatus::Pending))
        .await
        .unwrap();

    let pending = storage
        .list_requests(
            collection,
            RequestFilter {
                status: Some(RequestStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(pending.len(), 2);

    let latest = storage
        .find_request(collection, RequestFilter::any_status("alice", "bob"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, "r2");

    let involving = storage
        .list_requests(collection, RequestFilter::involving("alice"))
        .await
        .unwrap();
    assert_eq!(involving.len(), 3);
    assert_eq!(involving[0].id, "r1");

    let removed = storage
        .remove_request(
            collection,
            RequestFilter::pair("carol", "alice", RequestStatus::Pending),
        )
        .await
        .unwrap();
    assert_eq!(removed.map(|r| r.id), Some("r3".to_string()));
}

#[tokio::test]
async fn test_notification_status_filter() {
    let storage = create_test_storage().await;

    for (id, status) in [("n1", NotificationStatus::Unread), ("n2", NotificationStatus::Read)] {
        storage
            .create_notification(Notification {
                id: id.to_string(),
                user: "alice".to_string(),
                message: "hello".to_string(),
                status,
                time: Utc::now(),
            })
            .await
            .unwrap();
    }

    let unread = storage
        .list_notifications(Some(NotificationFilter {
            user: Some("alice".to_string()),
            status: Some(NotificationStatus::Unread),
        }))
        .await
        .unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].id, "n1");

    let updated = storage
        .update_notification_status("n1", NotificationStatus::Read)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, NotificationStatus::Read);
    assert!(
        storage
            .update_notification_status("missing", NotificationStatus::Read)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_clear_removes_everything() {
    let storage = create_test_storage().await;
    storage.prepare_request_collection("follow_requests").await.unwrap();

    storage.create_user(user("u1", "alice")).await.unwrap();
    storage
        .create_request(
            "follow_requests",
            request("r1", "alice", "bob", RequestStatus::Pending),
        )
        .await
        .unwrap();

    storage.clear().await.unwrap();

    assert!(storage.list_users().await.unwrap().is_empty());
    assert!(
        storage
            .list_requests("follow_requests", RequestFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_embedded_storage_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db").to_string_lossy().to_string();

    let storage = create_embedded_shared_storage(&path, SharedStorageConfig::default())
        .await
        .unwrap();
    storage.create_user(user("u1", "alice")).await.unwrap();

    assert!(storage.get_user_by_username("alice").await.unwrap().is_some());
    assert!(dir.path().join("db").exists());
}
