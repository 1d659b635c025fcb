//! Screen time accounting

use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use super::require_non_empty;
use crate::Result;
use crate::storage::models::ScreenTime;
use crate::storage::traits::ScreenTimeStore;

/// Minutes a user has spent on each feature
#[derive(Debug, Clone)]
pub struct ScreenTimeManager {
    store: Arc<dyn ScreenTimeStore>,
}

impl ScreenTimeManager {
    pub fn new(store: Arc<dyn ScreenTimeStore>) -> Self {
        Self { store }
    }

    /// Record the total minutes used, replacing any previous value
    pub async fn set_time_used(&self, user: &str, feature: &str, minutes: u64) -> Result<ScreenTime> {
        require_non_empty(user, "User")?;
        require_non_empty(feature, "Feature")?;

        let record = ScreenTime {
            user: user.to_string(),
            feature: feature.to_string(),
            time_used: minutes,
            updated_at: Utc::now(),
        };
        let stored = self.store.set_screen_time(record).await?;
        debug!("{} used {} for {} minutes", user, feature, minutes);
        Ok(stored)
    }

    /// Minutes used on `feature`; zero when nothing was recorded
    pub async fn get_time_used(&self, user: &str, feature: &str) -> Result<u64> {
        Ok(self
            .store
            .get_screen_time(user, feature)
            .await?
            .map_or(0, |record| record.time_used))
    }
}
