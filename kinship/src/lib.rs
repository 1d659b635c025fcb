//! # Kinship
//!
//! Backend library for a small social network: user accounts, posts,
//! notifications, screen-time restrictions and two relationship kinds
//! (follow and monitor) built on a shared request/relation state machine.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kinship::prelude::*;
//!
//! # async fn example() -> kinship::Result<()> {
//! let kinship = init(ConfigBuilder::development().build()?).await?;
//!
//! kinship.follow().send_request("alice", "bob").await?;
//! let relation = kinship.follow().accept_request("alice", "bob").await?;
//! assert_eq!(relation.from, "bob");
//! # Ok(())
//! # }
//! ```
//!
//! ## Relationships
//!
//! Each relationship kind is an explicit [`relationships::RelationshipManager`]
//! bound to its own pair of collections. Pending requests and relations are
//! keyed per ordered pair, so duplicates are rejected by storage rather than
//! by a lookup that could race.

pub mod config;
pub mod core;
pub mod logging;
pub mod relationships;
pub mod social;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::core::Kinship;
    pub use crate::{init, init_with_defaults};

    pub use crate::config::{ConfigBuilder, KinshipConfig, LogFormat, LogLevel};

    pub use crate::relationships::{
        RelationshipCollections, RelationshipError, RelationshipManager, RequestState,
    };

    pub use crate::social::{
        NotificationManager, PostManager, ScreenTimeManager, TimeRestrictionManager,
        UserManager,
    };

    pub use crate::storage::models::{
        Notification, NotificationStatus, Post, PostOptions, Relation, RelationRequest,
        RequestStatus, ScreenTime, Session, TimeRestriction, User,
    };
    pub use crate::storage::StorageError;

    pub use crate::{KinshipError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Kinship operations
#[derive(Debug, thiserror::Error)]
pub enum KinshipError {
    /// Error during storage operations
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),

    /// A referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// The caller may not perform the operation
    #[error("{0}")]
    NotAllowed(String),

    /// Malformed input
    #[error("{0}")]
    BadValues(String),

    /// A record with the same identity already exists
    #[error("{0}")]
    AlreadyExists(String),

    /// No valid session
    #[error("{0}")]
    Unauthenticated(String),

    /// Failure reported by a relationship manager
    #[error(transparent)]
    Relationship(#[from] crate::relationships::RelationshipError),
}

impl From<crate::config::ConfigError> for KinshipError {
    fn from(err: crate::config::ConfigError) -> Self {
        KinshipError::Configuration(err.to_string())
    }
}

/// Result type for Kinship operations
pub type Result<T> = std::result::Result<T, KinshipError>;

/// Initialize Kinship with the default production configuration
pub async fn init_with_defaults() -> Result<core::Kinship> {
    let config = config::ConfigBuilder::defaults().build()?;
    init(config).await
}

/// Initialize Kinship with the provided configuration
///
/// Sets up logging, connects the configured storage backend and constructs
/// one relationship manager per configured kind.
pub async fn init(config: config::KinshipConfig) -> Result<core::Kinship> {
    // Ignore errors if tracing is already initialized by the host application
    let _ = logging::init(&config.logging);

    let storage = storage::create_storage_service(&config).await?;

    core::Kinship::new(storage, config).await
}
