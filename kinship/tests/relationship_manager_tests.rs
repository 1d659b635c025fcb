//! Relationship manager behaviour against the in-memory SurrealDB engine

use std::sync::Arc;

use kinship::relationships::{
    RelationshipCollections, RelationshipError, RelationshipManager, RequestState,
};
use kinship::storage::{
    RequestFilter, RequestStatus, RequestStore, SharedStorageConfig, create_memory_shared_storage,
    traits::RelationshipStore,
};

async fn create_store() -> Arc<dyn RelationshipStore> {
    let storage = create_memory_shared_storage(SharedStorageConfig::default())
        .await
        .expect("Failed to create test storage");
    Arc::new(storage)
}

async fn follow_manager() -> RelationshipManager {
    RelationshipManager::new(create_store().await, RelationshipCollections::follow())
        .await
        .expect("Failed to create manager")
}

fn count(requests: &[kinship::storage::RelationRequest], from: &str, to: &str, status: RequestStatus) -> usize {
    requests
        .iter()
        .filter(|r| r.from == from && r.to == to && r.status == status)
        .count()
}

#[tokio::test]
async fn test_send_request_is_visible_to_both_parties() {
    let follow = follow_manager().await;

    let request = follow.send_request("alice", "bob").await.unwrap();
    assert_eq!(request.status, RequestStatus::Pending);

    for identity in ["alice", "bob"] {
        let requests = follow.get_requests(identity).await.unwrap();
        assert_eq!(count(&requests, "alice", "bob", RequestStatus::Pending), 1);
    }

    let err = follow.send_request("alice", "bob").await.unwrap_err();
    assert!(matches!(err, RelationshipError::AlreadyRequested { .. }));
    assert_eq!(err.to_string(), "Follow request from alice to bob already exists!");
    assert_eq!(err.identities(), vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_accept_creates_reverse_relation() {
    let follow = follow_manager().await;
    follow.send_request("alice", "bob").await.unwrap();

    let relation = follow.accept_request("alice", "bob").await.unwrap();
    assert_eq!(relation.from, "bob");
    assert_eq!(relation.to, "alice");

    let requests = follow.get_requests("alice").await.unwrap();
    assert_eq!(count(&requests, "alice", "bob", RequestStatus::Pending), 0);
    assert_eq!(count(&requests, "alice", "bob", RequestStatus::Accepted), 1);

    let relations = follow.get_relations("bob").await.unwrap();
    assert!(relations.iter().any(|r| r.from == "bob" && r.to == "alice"));
    assert!(follow.ensure_related("bob", "alice").await.is_ok());
    assert!(follow.ensure_not_related("alice", "bob").await.is_ok());
    assert_eq!(
        follow.request_state("alice", "bob").await.unwrap(),
        RequestState::Accepted
    );
}

#[tokio::test]
async fn test_reject_does_not_block_resubmission() {
    let follow = follow_manager().await;
    follow.send_request("alice", "bob").await.unwrap();

    let rejected = follow.reject_request("alice", "bob").await.unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);

    let requests = follow.get_requests("bob").await.unwrap();
    assert_eq!(count(&requests, "alice", "bob", RequestStatus::Pending), 0);
    assert_eq!(count(&requests, "alice", "bob", RequestStatus::Rejected), 1);
    assert_eq!(
        follow.request_state("alice", "bob").await.unwrap(),
        RequestState::Rejected
    );
    assert!(follow.get_relations("bob").await.unwrap().is_empty());

    follow.send_request("alice", "bob").await.unwrap();
    assert_eq!(
        follow.request_state("alice", "bob").await.unwrap(),
        RequestState::Pending
    );
}

#[tokio::test]
async fn test_remove_relation_twice_fails() {
    let follow = follow_manager().await;
    follow.send_request("alice", "bob").await.unwrap();
    follow.accept_request("alice", "bob").await.unwrap();

    let removed = follow.remove_relation("bob", "alice").await.unwrap();
    assert_eq!(removed.from, "bob");
    assert!(follow.get_relations("bob").await.unwrap().is_empty());

    let err = follow.remove_relation("bob", "alice").await.unwrap_err();
    assert!(matches!(err, RelationshipError::RelationNotFound { .. }));
}

#[tokio::test]
async fn test_accept_without_request_fails() {
    let follow = follow_manager().await;

    let err = follow.accept_request("alice", "bob").await.unwrap_err();
    assert!(matches!(err, RelationshipError::RequestNotFound { .. }));
    assert!(follow.get_relations("bob").await.unwrap().is_empty());
    assert!(follow.get_requests("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_full_lifecycle_allows_resend_after_removal() {
    let follow = follow_manager().await;

    follow.send_request("alice", "bob").await.unwrap();
    follow.accept_request("alice", "bob").await.unwrap();
    follow.ensure_related("bob", "alice").await.unwrap();

    // The relation blocks a new request for the same pair
    let err = follow.send_request("alice", "bob").await.unwrap_err();
    assert!(matches!(err, RelationshipError::AlreadyRelated { .. }));

    follow.remove_relation("bob", "alice").await.unwrap();
    let err = follow.ensure_related("bob", "alice").await.unwrap_err();
    assert!(matches!(err, RelationshipError::RelationNotFound { .. }));

    // The accepted record was purged with the relation
    assert_eq!(
        follow.request_state("alice", "bob").await.unwrap(),
        RequestState::None
    );
    follow.send_request("alice", "bob").await.unwrap();
}

#[tokio::test]
async fn test_cancel_leaves_no_record() {
    let follow = follow_manager().await;
    follow.send_request("alice", "bob").await.unwrap();

    follow.cancel_request("alice", "bob").await.unwrap();
    assert!(follow.get_requests("alice").await.unwrap().is_empty());
    assert_eq!(
        follow.request_state("alice", "bob").await.unwrap(),
        RequestState::None
    );

    let err = follow.cancel_request("alice", "bob").await.unwrap_err();
    assert!(matches!(err, RelationshipError::RequestNotFound { .. }));
}

#[tokio::test]
async fn test_self_and_empty_identities_are_rejected() {
    let follow = follow_manager().await;

    let err = follow.send_request("alice", "alice").await.unwrap_err();
    assert!(matches!(err, RelationshipError::BadValues { .. }));
    assert_eq!(err.code(), "bad_values");

    let err = follow.send_request("", "bob").await.unwrap_err();
    assert!(matches!(err, RelationshipError::BadValues { .. }));

    assert!(follow.get_requests("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_requests_are_per_ordered_pair() {
    let follow = follow_manager().await;

    follow.send_request("alice", "bob").await.unwrap();
    follow.send_request("bob", "alice").await.unwrap();
    follow.send_request("alice", "carol").await.unwrap();

    assert_eq!(follow.get_requests("alice").await.unwrap().len(), 3);
    assert_eq!(follow.get_requests("bob").await.unwrap().len(), 2);
    assert_eq!(follow.get_requests("carol").await.unwrap().len(), 1);

    follow.accept_request("bob", "alice").await.unwrap();
    follow.ensure_requested("alice", "bob").await.unwrap();
    follow.ensure_not_requested("bob", "alice").await.unwrap();
}

#[tokio::test]
async fn test_identities_containing_separators_do_not_collide() {
    let follow = follow_manager().await;

    follow.send_request("a_b", "c").await.unwrap();
    follow.send_request("a", "b_c").await.unwrap();
    follow.send_request("c", "a_b").await.unwrap();
    follow.send_request("b_c", "a").await.unwrap();

    follow.accept_request("c", "a_b").await.unwrap();
    follow.accept_request("b_c", "a").await.unwrap();

    follow.ensure_related("a_b", "c").await.unwrap();
    follow.ensure_related("a", "b_c").await.unwrap();
    follow.ensure_requested("a_b", "c").await.unwrap();
    follow.ensure_requested("a", "b_c").await.unwrap();

    follow.remove_relation("a_b", "c").await.unwrap();
    follow.ensure_related("a", "b_c").await.unwrap();
}

#[tokio::test]
async fn test_concurrent_sends_create_one_pending_request() {
    let follow = follow_manager().await;

    let (first, second) = tokio::join!(
        follow.send_request("alice", "bob"),
        follow.send_request("alice", "bob")
    );

    assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let failure = first.err().or(second.err()).unwrap();
    assert!(matches!(failure, RelationshipError::AlreadyRequested { .. }));

    let requests = follow.get_requests("alice").await.unwrap();
    assert_eq!(count(&requests, "alice", "bob", RequestStatus::Pending), 1);
}

#[tokio::test]
async fn test_concurrent_accepts_create_one_relation() {
    let follow = follow_manager().await;
    follow.send_request("alice", "bob").await.unwrap();

    let (first, second) = tokio::join!(
        follow.accept_request("alice", "bob"),
        follow.accept_request("alice", "bob")
    );

    assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let requests = follow.get_requests("alice").await.unwrap();
    assert_eq!(count(&requests, "alice", "bob", RequestStatus::Accepted), 1);
    assert_eq!(follow.get_relations("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_kinds_do_not_share_state() {
    let store = create_store().await;
    let follow = RelationshipManager::new(store.clone(), RelationshipCollections::follow())
        .await
        .unwrap();
    let monitor = RelationshipManager::new(store.clone(), RelationshipCollections::monitor())
        .await
        .unwrap();

    follow.send_request("alice", "bob").await.unwrap();
    follow.accept_request("alice", "bob").await.unwrap();

    assert!(monitor.get_requests("alice").await.unwrap().is_empty());
    assert!(monitor.get_relations("bob").await.unwrap().is_empty());
    monitor.send_request("alice", "bob").await.unwrap();

    let err = monitor.accept_request("bob", "alice").await.unwrap_err();
    assert_eq!(err.kind(), "Monitor");

    let pending = store
        .list_requests(
            "monitor_requests",
            RequestFilter::pair("alice", "bob", RequestStatus::Pending),
        )
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn test_invalid_collections_are_rejected() {
    let store = create_store().await;

    let result = RelationshipManager::new(
        store.clone(),
        RelationshipCollections::new("Follow", "follow relations", "follow_requests"),
    )
    .await;
    assert!(result.is_err());

    let result = RelationshipManager::new(
        store.clone(),
        RelationshipCollections::new("Follow", "same", "same"),
    )
    .await;
    assert!(result.is_err());

    let result = RelationshipManager::new(
        store,
        RelationshipCollections::new("Follow", "user", "follow_requests"),
    )
    .await;
    assert!(result.is_err());
}
