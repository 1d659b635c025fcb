//! Error types for storage operations

use std::error::Error;
use std::fmt;

/// Error type for storage operations
#[derive(Debug)]
pub enum StorageError {
    /// Configuration error
    Configuration(String),

    /// Connection error
    Connection(String),

    /// Query error
    Query(String),

    /// Validation error
    Validation(String),

    /// Data not found
    NotFound(String),

    /// Item already exists
    AlreadyExists(String),

    /// Serialization/deserialization error
    Serialization(String),

    /// Authentication error
    Authentication(String),

    /// Unsupported storage type
    UnsupportedStorageType,

    /// Other error
    Other(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Whether this error reports a uniqueness violation
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StorageError::AlreadyExists(_))
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            StorageError::Connection(msg) => write!(f, "Connection error: {}", msg),
            StorageError::Query(msg) => write!(f, "Query error: {}", msg),
            StorageError::Validation(msg) => write!(f, "Validation error: {}", msg),
            StorageError::NotFound(msg) => write!(f, "Not found: {}", msg),
            StorageError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
            StorageError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StorageError::Authentication(msg) => write!(f, "Authentication error: {}", msg),
            StorageError::UnsupportedStorageType => write!(f, "Unsupported storage type"),
            StorageError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl Error for StorageError {}

/// Convert a JSON error to a storage error
impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Convert a standard IO error to a storage error
impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Other(err.to_string())
    }
}

// This allows StorageError to be converted to the top-level KinshipError
impl From<StorageError> for crate::KinshipError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => crate::KinshipError::NotFound(msg),
            StorageError::AlreadyExists(msg) => crate::KinshipError::AlreadyExists(msg),
            StorageError::Validation(msg) => crate::KinshipError::BadValues(msg),
            other => crate::KinshipError::Storage(other.to_string()),
        }
    }
}
