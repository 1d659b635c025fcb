//! Errors reported by relationship managers

use crate::storage::errors::StorageError;

/// Failure of a relationship operation.
///
/// Every variant names the relationship kind and the identities involved.
#[derive(Debug, thiserror::Error)]
pub enum RelationshipError {
    /// A pending request for the ordered pair already exists
    #[error("{kind} request from {from} to {to} already exists!")]
    AlreadyRequested {
        kind: String,
        from: String,
        to: String,
    },

    /// The relation `from` relates-to `to` already exists
    #[error("{kind} relation from {from} to {to} already exists!")]
    AlreadyRelated {
        kind: String,
        from: String,
        to: String,
    },

    /// No pending request for the ordered pair
    #[error("{kind} request from {from} to {to} does not exist!")]
    RequestNotFound {
        kind: String,
        from: String,
        to: String,
    },

    /// The relation `from` relates-to `to` does not exist
    #[error("{kind} relation from {from} to {to} does not exist!")]
    RelationNotFound {
        kind: String,
        from: String,
        to: String,
    },

    /// Malformed or self-targeting input
    #[error("{message}")]
    BadValues {
        kind: String,
        from: String,
        to: String,
        message: String,
    },

    /// A multi-step operation failed and could not be rolled back
    #[error(
        "{kind} {operation} from {from} to {to} failed ({cause}) and could not be rolled back ({compensation})"
    )]
    PartialFailure {
        kind: String,
        operation: &'static str,
        from: String,
        to: String,
        cause: String,
        compensation: String,
    },

    /// The underlying store failed.
    ///
    /// Relations and pending requests removed by the operation have been
    /// restored. Accepted history already purged by `remove_relation` is not.
    #[error("{kind} {operation} failed for {}: {source}", .parties.join(", "))]
    Storage {
        kind: String,
        operation: &'static str,
        parties: Vec<String>,
        #[source]
        source: StorageError,
    },
}

impl RelationshipError {
    /// The relationship kind the failing operation worked on
    pub fn kind(&self) -> &str {
        match self {
            RelationshipError::AlreadyRequested { kind, .. }
            | RelationshipError::AlreadyRelated { kind, .. }
            | RelationshipError::RequestNotFound { kind, .. }
            | RelationshipError::RelationNotFound { kind, .. }
            | RelationshipError::BadValues { kind, .. }
            | RelationshipError::PartialFailure { kind, .. }
            | RelationshipError::Storage { kind, .. } => kind,
        }
    }

    /// The identities the failing operation was called with
    pub fn identities(&self) -> Vec<&str> {
        match self {
            RelationshipError::AlreadyRequested { from, to, .. }
            | RelationshipError::AlreadyRelated { from, to, .. }
            | RelationshipError::RequestNotFound { from, to, .. }
            | RelationshipError::RelationNotFound { from, to, .. }
            | RelationshipError::BadValues { from, to, .. }
            | RelationshipError::PartialFailure { from, to, .. } => vec![from, to],
            RelationshipError::Storage { parties, .. } => {
                parties.iter().map(String::as_str).collect()
            }
        }
    }

    /// Short machine-readable name of the error kind
    pub fn code(&self) -> &'static str {
        match self {
            RelationshipError::AlreadyRequested { .. } => "already_requested",
            RelationshipError::AlreadyRelated { .. } => "already_related",
            RelationshipError::RequestNotFound { .. } => "request_not_found",
            RelationshipError::RelationNotFound { .. } => "relation_not_found",
            RelationshipError::BadValues { .. } => "bad_values",
            RelationshipError::PartialFailure { .. } => "partial_failure",
            RelationshipError::Storage { .. } => "storage_error",
        }
    }
}
