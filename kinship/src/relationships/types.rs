//! Types shared by relationship managers

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::models::{Relation, RelationRequest, RequestStatus, pair_key};

/// Names of the collections backing one relationship kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipCollections {
    /// Human-readable kind, used in messages ("Follow", "Monitor")
    pub kind: String,

    /// Collection holding relation records
    pub relations: String,

    /// Collection holding request records
    pub requests: String,
}

impl RelationshipCollections {
    pub fn new(
        kind: impl Into<String>,
        relations: impl Into<String>,
        requests: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            relations: relations.into(),
            requests: requests.into(),
        }
    }

    /// Default collections for follow relationships
    pub fn follow() -> Self {
        Self::new("Follow", "follow_relations", "follow_requests")
    }

    /// Default collections for monitor relationships
    pub fn monitor() -> Self {
        Self::new("Monitor", "monitor_relations", "monitor_requests")
    }
}

/// State of an ordered (from, to) pair, derived from its request records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    None,
    Pending,
    Accepted,
    Rejected,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::None => "none",
            RequestState::Pending => "pending",
            RequestState::Accepted => "accepted",
            RequestState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

impl From<RequestStatus> for RequestState {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => RequestState::Pending,
            RequestStatus::Accepted => RequestState::Accepted,
            RequestStatus::Rejected => RequestState::Rejected,
        }
    }
}

/// Storage key of the relation `from` relates-to `to`.
///
/// Deterministic, so a second relation for the same ordered pair collides.
pub fn relation_key(from: &str, to: &str) -> String {
    pair_key(from, to)
}

/// Storage key of the pending request for an ordered pair.
///
/// Deterministic, so a concurrent duplicate send collides in storage.
pub fn pending_request_key(from: &str, to: &str) -> String {
    format!("pending_{}", pair_key(from, to))
}

pub(crate) fn new_relation(from: &str, to: &str) -> Relation {
    Relation {
        id: relation_key(from, to),
        from: from.to_string(),
        to: to.to_string(),
        created_at: Utc::now(),
    }
}

pub(crate) fn new_pending_request(from: &str, to: &str) -> RelationRequest {
    RelationRequest {
        id: pending_request_key(from, to),
        from: from.to_string(),
        to: to.to_string(),
        status: RequestStatus::Pending,
        created_at: Utc::now(),
    }
}

/// Terminal records are history; each one gets a fresh key
pub(crate) fn new_terminal_request(
    from: &str,
    to: &str,
    status: RequestStatus,
) -> RelationRequest {
    RelationRequest {
        id: uuid::Uuid::new_v4().simple().to_string(),
        from: from.to_string(),
        to: to.to_string(),
        status,
        created_at: Utc::now(),
    }
}
