//! User storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, RecordId};

use super::base::SharedStorage;
use super::write_error;
use crate::storage::errors::StorageError;
use crate::storage::models::User;
use crate::storage::traits::UserStore;

/// Internal representation of a user record for SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealUser {
    key: String,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<User> for SurrealUser {
    fn from(user: User) -> Self {
        Self {
            key: user.id,
            username: user.username,
            password_hash: user.password_hash,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<SurrealUser> for User {
    fn from(record: SurrealUser) -> Self {
        Self {
            id: record.key,
            username: record.username,
            password_hash: record.password_hash,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct UserPatch {
    username: String,
    password_hash: String,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl<C> UserStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_user(&self, user: User) -> Result<User, StorageError> {
        let record_id = RecordId::from(("user", user.id.as_str()));
        let created: Option<SurrealUser> = self
            .client
            .create(record_id)
            .content(SurrealUser::from(user))
            .await
            .map_err(|e| write_error("Failed to create user", e))?;

        created
            .map(User::from)
            .ok_or_else(|| StorageError::Other("No user created".to_string()))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        let record: Option<SurrealUser> = self
            .client
            .select(RecordId::from(("user", id)))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get user: {}", e)))?;

        Ok(record.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let mut response = self
            .client
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to query user: {}", e)))?;

        let records: Vec<SurrealUser> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to parse user: {}", e)))?;

        Ok(records.into_iter().next().map(User::from))
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let mut response = self
            .client
            .query("SELECT * FROM user ORDER BY username ASC")
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list users: {}", e)))?;

        let records: Vec<SurrealUser> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to parse users: {}", e)))?;

        Ok(records.into_iter().map(User::from).collect())
    }

    async fn update_user(&self, user: User) -> Result<User, StorageError> {
        let patch = UserPatch {
            username: user.username,
            password_hash: user.password_hash,
            updated_at: Utc::now(),
        };

        let updated: Option<SurrealUser> = self
            .client
            .update(RecordId::from(("user", user.id.as_str())))
            .merge(patch)
            .await
            .map_err(|e| write_error("Failed to update user", e))?;

        updated
            .map(User::from)
            .ok_or_else(|| StorageError::NotFound(format!("User {} not found", user.id)))
    }

    async fn delete_user(&self, id: &str) -> Result<bool, StorageError> {
        let deleted: Option<SurrealUser> = self
            .client
            .delete(RecordId::from(("user", id)))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete user: {}", e)))?;

        Ok(deleted.is_some())
    }
}
