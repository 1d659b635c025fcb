//! The `Kinship` facade
//!
//! Wires one shared store into every concept service. Relationship kinds get
//! their own [`RelationshipManager`] instance, built with the collections
//! named in the configuration.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::KinshipConfig;
use crate::relationships::RelationshipManager;
use crate::social::{
    NotificationManager, PostManager, ScreenTimeManager, SessionManager, TimeRestrictionManager,
    UserManager,
};
use crate::storage::traits::{
    NotificationStore, PostStore, RelationshipStore, RestrictionStore, ScreenTimeStore,
    SessionStore, SocialStore, UserStore,
};
use crate::{KinshipError, Result};

/// Usage of one feature measured against its restriction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureUsage {
    pub feature: String,
    pub time_used: u64,
    /// `None` when the feature is unrestricted
    pub limit: Option<u64>,
    pub exceeded: bool,
}

#[derive(Debug, Clone)]
pub struct Kinship {
    storage: Arc<dyn SocialStore>,
    config: KinshipConfig,
    users: UserManager,
    sessions: SessionManager,
    posts: PostManager,
    follow: RelationshipManager,
    monitor: RelationshipManager,
    notifications: NotificationManager,
    restrictions: TimeRestrictionManager,
    screen_time: ScreenTimeManager,
}

impl Kinship {
    pub async fn new(storage: Arc<dyn SocialStore>, config: KinshipConfig) -> Result<Self> {
        let relationships: Arc<dyn RelationshipStore> = storage.clone();
        let follow = RelationshipManager::new(
            relationships.clone(),
            config.relationships.follow.clone(),
        )
        .await?;
        let monitor =
            RelationshipManager::new(relationships, config.relationships.monitor.clone()).await?;

        let user_store: Arc<dyn UserStore> = storage.clone();
        let session_store: Arc<dyn SessionStore> = storage.clone();
        let post_store: Arc<dyn PostStore> = storage.clone();
        let notification_store: Arc<dyn NotificationStore> = storage.clone();
        let restriction_store: Arc<dyn RestrictionStore> = storage.clone();
        let screen_time_store: Arc<dyn ScreenTimeStore> = storage.clone();

        Ok(Self {
            users: UserManager::new(user_store, session_store.clone()),
            sessions: SessionManager::new(session_store),
            posts: PostManager::new(post_store),
            follow,
            monitor,
            notifications: NotificationManager::new(notification_store),
            restrictions: TimeRestrictionManager::new(restriction_store),
            screen_time: ScreenTimeManager::new(screen_time_store),
            storage,
            config,
        })
    }

    pub fn storage(&self) -> &Arc<dyn SocialStore> {
        &self.storage
    }

    pub fn config(&self) -> &KinshipConfig {
        &self.config
    }

    pub fn users(&self) -> &UserManager {
        &self.users
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn posts(&self) -> &PostManager {
        &self.posts
    }

    /// Follow relationships: a relation (a, b) means a follows b
    pub fn follow(&self) -> &RelationshipManager {
        &self.follow
    }

    /// Monitor relationships: a relation (a, b) means a monitors b
    pub fn monitor(&self) -> &RelationshipManager {
        &self.monitor
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn restrictions(&self) -> &TimeRestrictionManager {
        &self.restrictions
    }

    pub fn screen_time(&self) -> &ScreenTimeManager {
        &self.screen_time
    }

    /// Require that `actor` may manage the restrictions and screen time of
    /// `user`: the user themself or one of their monitors
    pub async fn ensure_can_manage(&self, actor: &str, user: &str) -> Result<()> {
        if actor == user || self.monitor.is_related(actor, user).await? {
            return Ok(());
        }
        Err(KinshipError::NotAllowed(format!(
            "{} does not monitor {}!",
            actor, user
        )))
    }

    /// Screen time on `feature` together with its restriction, if any
    pub async fn feature_usage(&self, user: &str, feature: &str) -> Result<FeatureUsage> {
        let time_used = self.screen_time.get_time_used(user, feature).await?;
        let limit = match self.restrictions.ensure_exists(user, feature).await {
            Ok(restriction) => Some(restriction.limit),
            Err(KinshipError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(FeatureUsage {
            feature: feature.to_string(),
            time_used,
            limit,
            exceeded: limit.is_some_and(|limit| time_used >= limit),
        })
    }

    /// Check connectivity to the storage backend
    pub async fn health_check(&self) -> Result<bool> {
        Ok(self.storage.health_check().await?)
    }

    /// Remove every record. Intended for tests and demos.
    pub async fn clear_storage(&self) -> Result<()> {
        Ok(self.storage.clear().await?)
    }
}
