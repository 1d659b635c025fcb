//! Notification storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, RecordId};

use super::base::SharedStorage;
use super::{where_clause, write_error};
use crate::storage::errors::StorageError;
use crate::storage::filters::NotificationFilter;
use crate::storage::models::{Notification, NotificationStatus};
use crate::storage::traits::NotificationStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealNotification {
    key: String,
    user_id: String,
    message: String,
    status: NotificationStatus,
    time: DateTime<Utc>,
}

impl From<Notification> for SurrealNotification {
    fn from(notification: Notification) -> Self {
        Self {
            key: notification.id,
            user_id: notification.user,
            message: notification.message,
            status: notification.status,
            time: notification.time,
        }
    }
}

impl From<SurrealNotification> for Notification {
    fn from(record: SurrealNotification) -> Self {
        Self {
            id: record.key,
            user: record.user_id,
            message: record.message,
            status: record.status,
            time: record.time,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusPatch {
    status: NotificationStatus,
}

#[async_trait]
impl<C> NotificationStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, StorageError> {
        let record_id = RecordId::from(("notification", notification.id.as_str()));
        let created: Option<SurrealNotification> = self
            .client
            .create(record_id)
            .content(SurrealNotification::from(notification))
            .await
            .map_err(|e| write_error("Failed to create notification", e))?;

        created
            .map(Notification::from)
            .ok_or_else(|| StorageError::Other("No notification created".to_string()))
    }

    async fn get_notification(&self, id: &str) -> Result<Option<Notification>, StorageError> {
        let record: Option<SurrealNotification> = self
            .client
            .select(RecordId::from(("notification", id)))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get notification: {}", e)))?;

        Ok(record.map(Notification::from))
    }

    async fn update_notification_status(
        &self,
        id: &str,
        status: NotificationStatus,
    ) -> Result<Option<Notification>, StorageError> {
        let updated: Option<SurrealNotification> = self
            .client
            .update(RecordId::from(("notification", id)))
            .merge(StatusPatch { status })
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update notification: {}", e)))?;

        Ok(updated.map(Notification::from))
    }

    async fn delete_notification(&self, id: &str) -> Result<bool, StorageError> {
        let deleted: Option<SurrealNotification> = self
            .client
            .delete(RecordId::from(("notification", id)))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete notification: {}", e)))?;

        Ok(deleted.is_some())
    }

    async fn list_notifications(
        &self,
        filter: Option<NotificationFilter>,
    ) -> Result<Vec<Notification>, StorageError> {
        let filter = filter.unwrap_or_default();

        let mut conditions = Vec::new();
        if filter.user.is_some() {
            conditions.push("user_id = $user");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        let query = format!("SELECT * FROM notification{}", where_clause(&conditions));

        let status = filter.status.map(|status| match status {
            NotificationStatus::Read => "read".to_string(),
            NotificationStatus::Unread => "unread".to_string(),
        });

        let mut response = self
            .client
            .query(query)
            .bind(("user", filter.user))
            .bind(("status", status))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list notifications: {}", e)))?;

        let records: Vec<SurrealNotification> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to parse notifications: {}", e)))?;

        let mut notifications: Vec<Notification> =
            records.into_iter().map(Notification::from).collect();
        notifications.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(notifications)
    }
}
