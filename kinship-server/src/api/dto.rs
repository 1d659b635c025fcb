//! Data Transfer Objects for the API
//!
//! Stored records refer to users by identity. Responses render identities as
//! usernames, so DTOs that mention users are built asynchronously against the
//! user store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use kinship::core::{FeatureUsage, Kinship};
use kinship::storage::models::{
    Notification, NotificationStatus, Post, PostOptions, Relation, RelationRequest,
    TimeRestriction, User,
};

use crate::error::ServerResult;

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// User DTO for API responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Account creation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

/// Partial account update; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub msg: String,
    /// Bearer token for subsequent requests
    pub token: String,
    pub username: String,
    /// When the token and its session expire
    pub expires_at: DateTime<Utc>,
}

/// Display options of a post
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PostOptionsDto {
    pub background_color: Option<String>,
}

impl From<PostOptions> for PostOptionsDto {
    fn from(options: PostOptions) -> Self {
        Self {
            background_color: options.background_color,
        }
    }
}

impl From<PostOptionsDto> for PostOptions {
    fn from(options: PostOptionsDto) -> Self {
        Self {
            background_color: options.background_color,
        }
    }
}

/// Post DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDto {
    pub id: String,
    /// Username of the author
    pub author: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<PostOptionsDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostDto {
    pub async fn render(kinship: &Kinship, post: Post) -> ServerResult<Self> {
        Ok(Self {
            author: kinship.users().username_of(&post.author).await?,
            id: post.id,
            content: post.content,
            options: post.options.map(PostOptionsDto::from),
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }

    pub async fn render_all(kinship: &Kinship, posts: Vec<Post>) -> ServerResult<Vec<Self>> {
        let mut rendered = Vec::with_capacity(posts.len());
        for post in posts {
            rendered.push(Self::render(kinship, post).await?);
        }
        Ok(rendered)
    }
}

/// Post creation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub content: String,
    pub options: Option<PostOptionsDto>,
}

/// Partial post update
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub options: Option<PostOptionsDto>,
}

/// Query parameters for listing posts
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPostsParams {
    /// Only posts by this username
    pub author: Option<String>,
}

/// Query parameters for post search
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Whitespace-separated keywords; every keyword must match
    #[serde(default)]
    pub search: String,
}

/// Relation DTO: `from` follows or monitors `to`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RelationDto {
    pub from: String,
    pub to: String,
    pub created_at: DateTime<Utc>,
}

impl RelationDto {
    pub async fn render(kinship: &Kinship, relation: Relation) -> ServerResult<Self> {
        let users = kinship.users();
        Ok(Self {
            from: users.username_of(&relation.from).await?,
            to: users.username_of(&relation.to).await?,
            created_at: relation.created_at,
        })
    }

    pub async fn render_all(
        kinship: &Kinship,
        relations: Vec<Relation>,
    ) -> ServerResult<Vec<Self>> {
        let mut rendered = Vec::with_capacity(relations.len());
        for relation in relations {
            rendered.push(Self::render(kinship, relation).await?);
        }
        Ok(rendered)
    }
}

/// Relationship request DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestDto {
    pub from: String,
    pub to: String,
    /// One of `pending`, `accepted`, `rejected`
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl RequestDto {
    pub async fn render(kinship: &Kinship, request: RelationRequest) -> ServerResult<Self> {
        let users = kinship.users();
        Ok(Self {
            from: users.username_of(&request.from).await?,
            to: users.username_of(&request.to).await?,
            status: request.status.to_string(),
            created_at: request.created_at,
        })
    }

    pub async fn render_all(
        kinship: &Kinship,
        requests: Vec<RelationRequest>,
    ) -> ServerResult<Vec<Self>> {
        let mut rendered = Vec::with_capacity(requests.len());
        for request in requests {
            rendered.push(Self::render(kinship, request).await?);
        }
        Ok(rendered)
    }
}

/// Notification DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationDto {
    pub id: String,
    /// Username of the recipient
    pub user: String,
    pub message: String,
    /// `read` or `unread`
    pub status: String,
    pub time: DateTime<Utc>,
}

impl NotificationDto {
    pub async fn render(kinship: &Kinship, notification: Notification) -> ServerResult<Self> {
        let status = match notification.status {
            NotificationStatus::Read => "read",
            NotificationStatus::Unread => "unread",
        };
        Ok(Self {
            user: kinship.users().username_of(&notification.user).await?,
            id: notification.id,
            message: notification.message,
            status: status.to_string(),
            time: notification.time,
        })
    }
}

/// Notification creation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNotificationRequest {
    pub content: String,
}

/// Query parameters for listing notifications
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListNotificationsParams {
    /// Only unread notifications
    #[serde(default)]
    pub unread: bool,
}

/// Screen time report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScreenTimeDto {
    pub feature: String,
    /// Minutes used
    pub time_used: u64,
}

/// Screen time update
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetScreenTimeRequest {
    /// Minutes used
    pub time_used: u64,
}

/// Time restriction DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestrictionDto {
    pub feature: String,
    /// Limit in minutes
    pub limit: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TimeRestriction> for RestrictionDto {
    fn from(restriction: TimeRestriction) -> Self {
        Self {
            feature: restriction.feature,
            limit: restriction.limit,
            created_at: restriction.created_at,
            updated_at: restriction.updated_at,
        }
    }
}

/// Restriction creation or update
#[derive(Debug, Deserialize, ToSchema)]
pub struct RestrictionRequest {
    pub feature: String,
    /// Limit in minutes
    pub limit: u64,
}

/// Identifies a restricted feature
#[derive(Debug, Deserialize, ToSchema)]
pub struct FeatureRequest {
    pub feature: String,
}

/// Usage of a feature against its restriction
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeatureUsageDto {
    pub feature: String,
    pub time_used: u64,
    /// Limit in minutes, absent when the feature is unrestricted
    pub limit: Option<u64>,
    pub exceeded: bool,
}

impl From<FeatureUsage> for FeatureUsageDto {
    fn from(usage: FeatureUsage) -> Self {
        Self {
            feature: usage.feature,
            time_used: usage.time_used,
            limit: usage.limit,
            exceeded: usage.exceeded,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: bool,
}
