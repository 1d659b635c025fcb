//! Notifications

use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use super::{new_id, require_non_empty};
use crate::storage::filters::NotificationFilter;
use crate::storage::models::{Notification, NotificationStatus};
use crate::storage::traits::NotificationStore;
use crate::{KinshipError, Result};

#[derive(Debug, Clone)]
pub struct NotificationManager {
    store: Arc<dyn NotificationStore>,
}

impl NotificationManager {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Deliver an unread notification to `user`
    pub async fn add(&self, user: &str, message: &str) -> Result<Notification> {
        require_non_empty(user, "Recipient")?;
        require_non_empty(message, "Notification message")?;

        let notification = Notification {
            id: new_id(),
            user: user.to_string(),
            message: message.to_string(),
            status: NotificationStatus::Unread,
            time: Utc::now(),
        };

        let created = self.store.create_notification(notification).await?;
        debug!("Notification {} added for {}", created.id, user);
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<Notification> {
        self.store
            .get_notification(id)
            .await?
            .ok_or_else(|| notification_not_found(id))
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        if !self.store.delete_notification(id).await? {
            return Err(notification_not_found(id));
        }
        debug!("Notification {} removed", id);
        Ok(())
    }

    /// Mark as read; reading twice is harmless
    pub async fn read(&self, id: &str) -> Result<Notification> {
        self.store
            .update_notification_status(id, NotificationStatus::Read)
            .await?
            .ok_or_else(|| notification_not_found(id))
    }

    /// Notifications for `user`, newest first
    pub async fn get_user_notifications(&self, user: &str) -> Result<Vec<Notification>> {
        self.list(user, None).await
    }

    pub async fn get_unread(&self, user: &str) -> Result<Vec<Notification>> {
        self.list(user, Some(NotificationStatus::Unread)).await
    }

    /// Require that `user` is the recipient
    pub async fn ensure_owner(&self, user: &str, id: &str) -> Result<Notification> {
        let notification = self.get(id).await?;
        if notification.user != user {
            return Err(KinshipError::NotAllowed(format!(
                "{} is not the recipient of notification {}!",
                user, id
            )));
        }
        Ok(notification)
    }

    async fn list(
        &self,
        user: &str,
        status: Option<NotificationStatus>,
    ) -> Result<Vec<Notification>> {
        let filter = NotificationFilter {
            user: Some(user.to_string()),
            status,
        };
        Ok(self.store.list_notifications(Some(filter)).await?)
    }
}

fn notification_not_found(id: &str) -> KinshipError {
    KinshipError::NotFound(format!("Notification {} does not exist!", id))
}
