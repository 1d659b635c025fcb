//! Filter types for storage queries
//!
//! Every set field is an exact-match condition; set fields are combined with AND.

use serde::{Deserialize, Serialize};

use crate::storage::models::{NotificationStatus, RequestStatus};

/// Filter for relation queries
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RelationFilter {
    /// Filter by the relating party
    pub from: Option<String>,

    /// Filter by the related-to party
    pub to: Option<String>,

    /// Match relations where this identity is either party
    pub involving: Option<String>,
}

impl RelationFilter {
    /// Exactly the relation `from` relates-to `to`
    pub fn pair(from: &str, to: &str) -> Self {
        Self {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            involving: None,
        }
    }

    /// Relations where `identity` is either party
    pub fn involving(identity: &str) -> Self {
        Self {
            involving: Some(identity.to_string()),
            ..Default::default()
        }
    }
}

/// Filter for request queries
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RequestFilter {
    /// Filter by sender
    pub from: Option<String>,

    /// Filter by recipient
    pub to: Option<String>,

    /// Filter by status
    pub status: Option<RequestStatus>,

    /// Match requests where this identity is sender or recipient
    pub involving: Option<String>,
}

impl RequestFilter {
    /// Records for the ordered pair with the given status
    pub fn pair(from: &str, to: &str, status: RequestStatus) -> Self {
        Self {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            status: Some(status),
            involving: None,
        }
    }

    /// Records for the ordered pair in any status
    pub fn any_status(from: &str, to: &str) -> Self {
        Self {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            ..Default::default()
        }
    }

    /// Records where `identity` is sender or recipient
    pub fn involving(identity: &str) -> Self {
        Self {
            involving: Some(identity.to_string()),
            ..Default::default()
        }
    }
}

/// Filter for post queries
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PostFilter {
    /// Filter by author identity
    pub author: Option<String>,

    /// Case-insensitive substring match on content
    pub content_contains: Option<String>,
}

/// Filter for notification queries
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NotificationFilter {
    /// Filter by recipient
    pub user: Option<String>,

    /// Filter by read state
    pub status: Option<NotificationStatus>,
}
