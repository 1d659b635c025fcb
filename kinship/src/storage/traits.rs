//! Trait definitions for storage components in Kinship

use async_trait::async_trait;
use std::fmt::Debug;

use crate::storage::errors::StorageError;
use crate::storage::filters::{NotificationFilter, PostFilter, RelationFilter, RequestFilter};
use crate::storage::models::{
    Notification, NotificationStatus, Post, Relation, RelationRequest, ScreenTime, Session,
    TimeRestriction, User,
};

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> std::result::Result<bool, StorageError>;

    /// Clear all data in the store
    async fn clear(&self) -> std::result::Result<(), StorageError>;

    /// Get metadata about the store
    async fn get_metadata(&self) -> std::result::Result<serde_json::Value, StorageError>;

    /// Close connections and release resources
    async fn close(&self) -> std::result::Result<(), StorageError>;
}

/// Trait for user account operations
#[async_trait]
pub trait UserStore: BaseStore {
    /// Create a user; fails with `AlreadyExists` when the username is taken
    async fn create_user(&self, user: User) -> std::result::Result<User, StorageError>;

    /// Get a user by identity
    async fn get_user(&self, id: &str) -> std::result::Result<Option<User>, StorageError>;

    /// Get a user by username
    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> std::result::Result<Option<User>, StorageError>;

    /// List all users ordered by username
    async fn list_users(&self) -> std::result::Result<Vec<User>, StorageError>;

    /// Replace a user's username/password hash
    async fn update_user(&self, user: User) -> std::result::Result<User, StorageError>;

    /// Delete a user by identity
    async fn delete_user(&self, id: &str) -> std::result::Result<bool, StorageError>;
}

/// Trait for login session operations
#[async_trait]
pub trait SessionStore: BaseStore {
    async fn create_session(&self, session: Session) -> std::result::Result<Session, StorageError>;

    async fn get_session(&self, id: &str) -> std::result::Result<Option<Session>, StorageError>;

    async fn delete_session(&self, id: &str) -> std::result::Result<bool, StorageError>;

    /// Delete every session of a user, returning how many were removed
    async fn delete_user_sessions(&self, user_id: &str)
    -> std::result::Result<usize, StorageError>;
}

/// Trait for post operations
#[async_trait]
pub trait PostStore: BaseStore {
    async fn create_post(&self, post: Post) -> std::result::Result<Post, StorageError>;

    async fn get_post(&self, id: &str) -> std::result::Result<Option<Post>, StorageError>;

    /// Update content/options of an existing post
    async fn update_post(&self, post: Post) -> std::result::Result<Post, StorageError>;

    async fn delete_post(&self, id: &str) -> std::result::Result<bool, StorageError>;

    /// List posts, newest first
    async fn list_posts(
        &self,
        filter: Option<PostFilter>,
    ) -> std::result::Result<Vec<Post>, StorageError>;
}

/// Trait for relation records.
///
/// Every method names the collection it works on so that one store serves
/// all relationship kinds.
#[async_trait]
pub trait RelationStore: BaseStore {
    /// Prepare a collection (tables, indexes) before first use
    async fn prepare_relation_collection(
        &self,
        collection: &str,
    ) -> std::result::Result<(), StorageError>;

    /// Insert a relation under its id; fails with `AlreadyExists` if that id is taken
    async fn create_relation(
        &self,
        collection: &str,
        relation: Relation,
    ) -> std::result::Result<Relation, StorageError>;

    /// Find the first relation matching the filter
    async fn find_relation(
        &self,
        collection: &str,
        filter: RelationFilter,
    ) -> std::result::Result<Option<Relation>, StorageError>;

    /// List relations matching the filter, oldest first
    async fn list_relations(
        &self,
        collection: &str,
        filter: RelationFilter,
    ) -> std::result::Result<Vec<Relation>, StorageError>;

    /// Remove one relation matching the filter, returning it if this call removed it
    async fn remove_relation(
        &self,
        collection: &str,
        filter: RelationFilter,
    ) -> std::result::Result<Option<Relation>, StorageError>;
}

/// Trait for relationship request records
#[async_trait]
pub trait RequestStore: BaseStore {
    /// Prepare a collection (tables, indexes) before first use
    async fn prepare_request_collection(
        &self,
        collection: &str,
    ) -> std::result::Result<(), StorageError>;

    /// Insert a request under its id; fails with `AlreadyExists` if that id is taken
    async fn create_request(
        &self,
        collection: &str,
        request: RelationRequest,
    ) -> std::result::Result<RelationRequest, StorageError>;

    /// Find the most recent request matching the filter
    async fn find_request(
        &self,
        collection: &str,
        filter: RequestFilter,
    ) -> std::result::Result<Option<RelationRequest>, StorageError>;

    /// List requests matching the filter, oldest first
    async fn list_requests(
        &self,
        collection: &str,
        filter: RequestFilter,
    ) -> std::result::Result<Vec<RelationRequest>, StorageError>;

    /// Remove one request matching the filter, returning it if this call removed it
    async fn remove_request(
        &self,
        collection: &str,
        filter: RequestFilter,
    ) -> std::result::Result<Option<RelationRequest>, StorageError>;
}

/// Trait for notification operations
#[async_trait]
pub trait NotificationStore: BaseStore {
    async fn create_notification(
        &self,
        notification: Notification,
    ) -> std::result::Result<Notification, StorageError>;

    async fn get_notification(
        &self,
        id: &str,
    ) -> std::result::Result<Option<Notification>, StorageError>;

    /// Set the read state, returning the updated notification if it exists
    async fn update_notification_status(
        &self,
        id: &str,
        status: NotificationStatus,
    ) -> std::result::Result<Option<Notification>, StorageError>;

    async fn delete_notification(&self, id: &str) -> std::result::Result<bool, StorageError>;

    /// List notifications, newest first
    async fn list_notifications(
        &self,
        filter: Option<NotificationFilter>,
    ) -> std::result::Result<Vec<Notification>, StorageError>;
}

/// Trait for time restriction operations
#[async_trait]
pub trait RestrictionStore: BaseStore {
    /// Create a restriction; fails with `AlreadyExists` for a duplicate (user, feature)
    async fn create_restriction(
        &self,
        restriction: TimeRestriction,
    ) -> std::result::Result<TimeRestriction, StorageError>;

    async fn get_restriction(
        &self,
        user: &str,
        feature: &str,
    ) -> std::result::Result<Option<TimeRestriction>, StorageError>;

    /// Change the limit, returning the updated restriction if it exists
    async fn update_restriction_limit(
        &self,
        user: &str,
        feature: &str,
        limit: u64,
    ) -> std::result::Result<Option<TimeRestriction>, StorageError>;

    async fn delete_restriction(
        &self,
        user: &str,
        feature: &str,
    ) -> std::result::Result<bool, StorageError>;

    async fn list_restrictions(
        &self,
        user: &str,
    ) -> std::result::Result<Vec<TimeRestriction>, StorageError>;
}

/// Trait for screen time bookkeeping
#[async_trait]
pub trait ScreenTimeStore: BaseStore {
    /// Insert or replace the usage record for (user, feature)
    async fn set_screen_time(
        &self,
        screen_time: ScreenTime,
    ) -> std::result::Result<ScreenTime, StorageError>;

    async fn get_screen_time(
        &self,
        user: &str,
        feature: &str,
    ) -> std::result::Result<Option<ScreenTime>, StorageError>;
}

/// The two stores backing a relationship kind
pub trait RelationshipStore: RelationStore + RequestStore {}

impl<T> RelationshipStore for T where T: RelationStore + RequestStore + ?Sized {}

/// Combined storage used by the application
pub trait SocialStore:
    UserStore
    + SessionStore
    + PostStore
    + RelationshipStore
    + NotificationStore
    + RestrictionStore
    + ScreenTimeStore
{
}

impl<T> SocialStore for T where
    T: UserStore
        + SessionStore
        + PostStore
        + RelationshipStore
        + NotificationStore
        + RestrictionStore
        + ScreenTimeStore
        + ?Sized
{
}
