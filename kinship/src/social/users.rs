//! User accounts
//!
//! Passwords arrive already hashed; hashing belongs to the caller.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::{new_id, require_non_empty};
use crate::storage::models::User;
use crate::storage::traits::{SessionStore, UserStore};
use crate::{KinshipError, Result};

/// Placeholder rendered for identities whose user record is gone
pub const DELETED_USER: &str = "DELETED_USER";

/// Changes applied by [`UserManager::update`]
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserManager {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { users, sessions }
    }

    /// Register a user; usernames are unique
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<User> {
        if username.trim().is_empty() || password_hash.is_empty() {
            return Err(KinshipError::BadValues(
                "Username and password must be non-empty!".to_string(),
            ));
        }
        self.ensure_username_free(username).await?;

        let now = Utc::now();
        let user = User {
            id: new_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };

        let created = self.users.create_user(user).await.map_err(|e| {
            if e.is_already_exists() {
                username_taken(username)
            } else {
                e.into()
            }
        })?;

        info!("Created user {}", created.username);
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        self.users
            .get_user(id)
            .await?
            .ok_or_else(|| KinshipError::NotFound(format!("User {} does not exist!", id)))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        self.users
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| {
                KinshipError::NotFound(format!("User with username {} does not exist!", username))
            })
    }

    /// Identity behind a username
    pub async fn resolve(&self, username: &str) -> Result<String> {
        Ok(self.get_by_username(username).await?.id)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.list_users().await?)
    }

    /// Username for an identity, or [`DELETED_USER`] when the account is gone
    pub async fn username_of(&self, id: &str) -> Result<String> {
        Ok(self
            .users
            .get_user(id)
            .await?
            .map_or_else(|| DELETED_USER.to_string(), |user| user.username))
    }

    pub async fn update(&self, id: &str, update: UserUpdate) -> Result<User> {
        let mut user = self.get(id).await?;

        if let Some(username) = update.username {
            require_non_empty(&username, "Username")?;
            if username != user.username {
                self.ensure_username_free(&username).await?;
                user.username = username;
            }
        }
        if let Some(password_hash) = update.password_hash {
            require_non_empty(&password_hash, "Password")?;
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        let username = user.username.clone();
        let updated = self.users.update_user(user).await.map_err(|e| {
            if e.is_already_exists() {
                username_taken(&username)
            } else {
                e.into()
            }
        })?;

        info!("Updated user {}", updated.id);
        Ok(updated)
    }

    /// Delete the account and end all of its sessions
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.users.delete_user(id).await? {
            return Err(KinshipError::NotFound(format!("User {} does not exist!", id)));
        }
        let ended = self.sessions.delete_user_sessions(id).await?;
        info!("Deleted user {} and {} session(s)", id, ended);
        Ok(())
    }

    async fn ensure_username_free(&self, username: &str) -> Result<()> {
        match self.users.get_user_by_username(username).await? {
            Some(_) => Err(username_taken(username)),
            None => Ok(()),
        }
    }
}

fn username_taken(username: &str) -> KinshipError {
    KinshipError::NotAllowed(format!("User with username {} already exists!", username))
}
