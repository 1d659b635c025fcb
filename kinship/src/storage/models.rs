//! Data structures and models for storage operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Opaque identity reference
    pub id: String,

    /// Unique human-readable handle
    pub username: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// Login session bound to a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Session identifier carried in the access token
    pub id: String,

    /// Owner of the session
    pub user_id: String,

    /// When the session was opened
    pub created_at: DateTime<Utc>,

    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is past its expiry
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Display options attached to a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PostOptions {
    /// Background colour used when rendering the post
    pub background_color: Option<String>,
}

/// A post written by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Unique identifier for the post
    pub id: String,

    /// Identity of the author
    pub author: String,

    /// Text of the post
    pub content: String,

    /// Optional display options
    pub options: Option<PostOptions>,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// When the post was last updated
    pub updated_at: DateTime<Utc>,
}

/// Established directed relationship: `from` relates-to `to`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relation {
    /// Storage key of the relation
    pub id: String,

    /// The party that relates (e.g. the follower or the monitor)
    pub from: String,

    /// The party being related to
    pub to: String,

    /// When the relation was established
    pub created_at: DateTime<Utc>,
}

/// Disposition of a relationship request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "rejected" => Ok(RequestStatus::Rejected),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

/// Relationship proposal and its disposition.
///
/// Accepting or rejecting never updates a record in place: the pending record
/// is removed and a new terminal record is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationRequest {
    /// Storage key of the request record
    pub id: String,

    /// Identity that sent the request
    pub from: String,

    /// Identity the request was sent to
    pub to: String,

    /// Current status of this record
    pub status: RequestStatus,

    /// When this record was written
    pub created_at: DateTime<Utc>,
}

/// Read state of a notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Read,
    Unread,
}

/// Message delivered to a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,

    /// Recipient identity
    pub user: String,

    pub message: String,

    pub status: NotificationStatus,

    /// When the notification was created
    pub time: DateTime<Utc>,
}

/// Daily usage limit for a feature, in minutes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeRestriction {
    pub id: String,

    /// Restricted user
    pub user: String,

    /// Feature (site or app) the limit applies to
    pub feature: String,

    /// Limit in minutes
    pub limit: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Time a user has spent on a feature, in minutes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenTime {
    pub user: String,

    pub feature: String,

    pub time_used: u64,

    pub updated_at: DateTime<Utc>,
}

/// Record key for an ordered pair of opaque strings.
///
/// The first part is length-prefixed, so distinct pairs never share a key even
/// when the parts themselves contain the separator.
pub fn pair_key(first: &str, second: &str) -> String {
    format!("{}_{}_{}", first.len(), first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_unambiguous() {
        assert_eq!(pair_key("a", "b"), pair_key("a", "b"));
        assert_ne!(pair_key("a", "b"), pair_key("b", "a"));
        assert_ne!(pair_key("a_b", "c"), pair_key("a", "b_c"));
        assert_ne!(pair_key("1_a", "b"), pair_key("1", "a_b"));
        assert_ne!(pair_key("", "a_b"), pair_key("a", "b"));
    }
}
