//! Session storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, RecordId};

use super::base::SharedStorage;
use super::write_error;
use crate::storage::errors::StorageError;
use crate::storage::models::Session;
use crate::storage::traits::SessionStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealSession {
    key: String,
    user_id: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<Session> for SurrealSession {
    fn from(session: Session) -> Self {
        Self {
            key: session.id,
            user_id: session.user_id,
            created_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

impl From<SurrealSession> for Session {
    fn from(record: SurrealSession) -> Self {
        Self {
            id: record.key,
            user_id: record.user_id,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}

#[async_trait]
impl<C> SessionStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_session(&self, session: Session) -> Result<Session, StorageError> {
        let record_id = RecordId::from(("session", session.id.as_str()));
        let created: Option<SurrealSession> = self
            .client
            .create(record_id)
            .content(SurrealSession::from(session))
            .await
            .map_err(|e| write_error("Failed to create session", e))?;

        created
            .map(Session::from)
            .ok_or_else(|| StorageError::Other("No session created".to_string()))
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, StorageError> {
        let record: Option<SurrealSession> = self
            .client
            .select(RecordId::from(("session", id)))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get session: {}", e)))?;

        Ok(record.map(Session::from))
    }

    async fn delete_session(&self, id: &str) -> Result<bool, StorageError> {
        let deleted: Option<SurrealSession> = self
            .client
            .delete(RecordId::from(("session", id)))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete session: {}", e)))?;

        Ok(deleted.is_some())
    }

    async fn delete_user_sessions(&self, user_id: &str) -> Result<usize, StorageError> {
        let mut response = self
            .client
            .query("DELETE FROM session WHERE user_id = $user_id RETURN BEFORE")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete sessions: {}", e)))?;

        let deleted: Vec<SurrealSession> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to parse deleted sessions: {}", e)))?;

        Ok(deleted.len())
    }
}
