//! Time restriction and screen time storage implementation
//!
//! Both tables are keyed by (user, feature), so there is at most one
//! restriction and one usage counter per pair.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, RecordId};

use super::base::SharedStorage;
use super::write_error;
use crate::storage::errors::StorageError;
use crate::storage::models::{ScreenTime, TimeRestriction, pair_key};
use crate::storage::traits::{RestrictionStore, ScreenTimeStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealRestriction {
    key: String,
    user_id: String,
    feature: String,
    limit_minutes: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TimeRestriction> for SurrealRestriction {
    fn from(restriction: TimeRestriction) -> Self {
        Self {
            key: restriction.id,
            user_id: restriction.user,
            feature: restriction.feature,
            limit_minutes: restriction.limit,
            created_at: restriction.created_at,
            updated_at: restriction.updated_at,
        }
    }
}

impl From<SurrealRestriction> for TimeRestriction {
    fn from(record: SurrealRestriction) -> Self {
        Self {
            id: record.key,
            user: record.user_id,
            feature: record.feature,
            limit: record.limit_minutes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct LimitPatch {
    limit_minutes: u64,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealScreenTime {
    user_id: String,
    feature: String,
    time_used: u64,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl<C> RestrictionStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_restriction(
        &self,
        mut restriction: TimeRestriction,
    ) -> Result<TimeRestriction, StorageError> {
        restriction.id = pair_key(&restriction.user, &restriction.feature);
        let record_id = RecordId::from(("time_restriction", restriction.id.as_str()));

        let created: Option<SurrealRestriction> = self
            .client
            .create(record_id)
            .content(SurrealRestriction::from(restriction))
            .await
            .map_err(|e| write_error("Failed to create time restriction", e))?;

        created
            .map(TimeRestriction::from)
            .ok_or_else(|| StorageError::Other("No time restriction created".to_string()))
    }

    async fn get_restriction(
        &self,
        user: &str,
        feature: &str,
    ) -> Result<Option<TimeRestriction>, StorageError> {
        let key = pair_key(user, feature);
        let record: Option<SurrealRestriction> = self
            .client
            .select(RecordId::from(("time_restriction", key.as_str())))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get time restriction: {}", e)))?;

        Ok(record.map(TimeRestriction::from))
    }

    async fn update_restriction_limit(
        &self,
        user: &str,
        feature: &str,
        limit: u64,
    ) -> Result<Option<TimeRestriction>, StorageError> {
        let key = pair_key(user, feature);
        let patch = LimitPatch {
            limit_minutes: limit,
            updated_at: Utc::now(),
        };

        let updated: Option<SurrealRestriction> = self
            .client
            .update(RecordId::from(("time_restriction", key.as_str())))
            .merge(patch)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update time restriction: {}", e)))?;

        Ok(updated.map(TimeRestriction::from))
    }

    async fn delete_restriction(&self, user: &str, feature: &str) -> Result<bool, StorageError> {
        let key = pair_key(user, feature);
        let deleted: Option<SurrealRestriction> = self
            .client
            .delete(RecordId::from(("time_restriction", key.as_str())))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete time restriction: {}", e)))?;

        Ok(deleted.is_some())
    }

    async fn list_restrictions(&self, user: &str) -> Result<Vec<TimeRestriction>, StorageError> {
        let mut response = self
            .client
            .query("SELECT * FROM time_restriction WHERE user_id = $user ORDER BY feature ASC")
            .bind(("user", user.to_string()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list time restrictions: {}", e)))?;

        let records: Vec<SurrealRestriction> = response.take(0).map_err(|e| {
            StorageError::Query(format!("Failed to parse time restrictions: {}", e))
        })?;

        Ok(records.into_iter().map(TimeRestriction::from).collect())
    }
}

#[async_trait]
impl<C> ScreenTimeStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn set_screen_time(&self, screen_time: ScreenTime) -> Result<ScreenTime, StorageError> {
        let key = pair_key(&screen_time.user, &screen_time.feature);
        let record = SurrealScreenTime {
            user_id: screen_time.user,
            feature: screen_time.feature,
            time_used: screen_time.time_used,
            updated_at: screen_time.updated_at,
        };

        let stored: Option<SurrealScreenTime> = self
            .client
            .upsert(RecordId::from(("screen_time", key.as_str())))
            .content(record)
            .await
            .map_err(|e| write_error("Failed to record screen time", e))?;

        stored
            .map(|record| ScreenTime {
                user: record.user_id,
                feature: record.feature,
                time_used: record.time_used,
                updated_at: record.updated_at,
            })
            .ok_or_else(|| StorageError::Other("No screen time recorded".to_string()))
    }

    async fn get_screen_time(
        &self,
        user: &str,
        feature: &str,
    ) -> Result<Option<ScreenTime>, StorageError> {
        let key = pair_key(user, feature);
        let record: Option<SurrealScreenTime> = self
            .client
            .select(RecordId::from(("screen_time", key.as_str())))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get screen time: {}", e)))?;

        Ok(record.map(|record| ScreenTime {
            user: record.user_id,
            feature: record.feature,
            time_used: record.time_used,
            updated_at: record.updated_at,
        }))
    }
}
