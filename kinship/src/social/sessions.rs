//! Login sessions

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::debug;

use super::new_id;
use crate::storage::models::Session;
use crate::storage::traits::SessionStore;
use crate::{KinshipError, Result};

#[derive(Debug, Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Start a session for `user_id` that expires after `ttl`
    pub async fn start(&self, user_id: &str, ttl: Duration) -> Result<Session> {
        let now = Utc::now();
        let session = Session {
            id: new_id(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + ttl,
        };
        let session = self.store.create_session(session).await?;
        debug!("Started session {} for user {}", session.id, user_id);
        Ok(session)
    }

    /// The live session with this id; expired sessions are removed
    pub async fn validate(&self, id: &str) -> Result<Session> {
        let session = self
            .store
            .get_session(id)
            .await?
            .ok_or_else(|| KinshipError::Unauthenticated("Must be logged in!".to_string()))?;

        if session.is_expired() {
            self.store.delete_session(id).await?;
            return Err(KinshipError::Unauthenticated(
                "Session has expired!".to_string(),
            ));
        }

        Ok(session)
    }

    /// End a session; ending an unknown session is not an error
    pub async fn end(&self, id: &str) -> Result<bool> {
        Ok(self.store.delete_session(id).await?)
    }
}
