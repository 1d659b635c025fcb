//! Time restrictions on features

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::require_non_empty;
use crate::storage::models::TimeRestriction;
use crate::storage::traits::RestrictionStore;
use crate::{KinshipError, Result};

/// Daily limits, in minutes, on a user's use of a feature.
///
/// A user has at most one restriction per feature.
#[derive(Debug, Clone)]
pub struct TimeRestrictionManager {
    store: Arc<dyn RestrictionStore>,
}

impl TimeRestrictionManager {
    pub fn new(store: Arc<dyn RestrictionStore>) -> Self {
        Self { store }
    }

    pub async fn add(&self, user: &str, feature: &str, limit: u64) -> Result<TimeRestriction> {
        validate(user, feature, limit)?;

        let now = Utc::now();
        let restriction = TimeRestriction {
            id: String::new(),
            user: user.to_string(),
            feature: feature.to_string(),
            limit,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .store
            .create_restriction(restriction)
            .await
            .map_err(|e| {
                if e.is_already_exists() {
                    KinshipError::NotAllowed(format!(
                        "Time Restriction on {} already exists for {}!",
                        feature, user
                    ))
                } else {
                    e.into()
                }
            })?;

        info!("Restricted {} on {} to {} minutes", user, feature, limit);
        Ok(created)
    }

    /// Change the limit of an existing restriction
    pub async fn set(&self, user: &str, feature: &str, limit: u64) -> Result<TimeRestriction> {
        validate(user, feature, limit)?;

        let updated = self
            .store
            .update_restriction_limit(user, feature, limit)
            .await?
            .ok_or_else(|| restriction_not_found(user, feature))?;

        info!("Restriction of {} on {} set to {} minutes", user, feature, limit);
        Ok(updated)
    }

    pub async fn remove(&self, user: &str, feature: &str) -> Result<()> {
        if !self.store.delete_restriction(user, feature).await? {
            return Err(restriction_not_found(user, feature));
        }
        info!("Restriction of {} on {} removed", user, feature);
        Ok(())
    }

    /// The restriction on `feature`, failing with NotFound when there is none
    pub async fn ensure_exists(&self, user: &str, feature: &str) -> Result<TimeRestriction> {
        self.store
            .get_restriction(user, feature)
            .await?
            .ok_or_else(|| restriction_not_found(user, feature))
    }

    pub async fn list(&self, user: &str) -> Result<Vec<TimeRestriction>> {
        Ok(self.store.list_restrictions(user).await?)
    }

    /// Whether `time_used` minutes reach the limit on `feature`
    pub async fn is_exceeded(&self, user: &str, feature: &str, time_used: u64) -> Result<bool> {
        let restriction = self.ensure_exists(user, feature).await?;
        Ok(time_used >= restriction.limit)
    }
}

fn validate(user: &str, feature: &str, limit: u64) -> Result<()> {
    require_non_empty(user, "User")?;
    require_non_empty(feature, "Feature")?;
    if limit == 0 {
        return Err(KinshipError::BadValues(format!(
            "The restriction limit cannot be {}!",
            limit
        )));
    }
    Ok(())
}

fn restriction_not_found(user: &str, feature: &str) -> KinshipError {
    KinshipError::NotFound(format!(
        "Time Restriction on {} not found for {}!",
        feature, user
    ))
}
