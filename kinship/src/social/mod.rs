//! Concept services other than relationships
//!
//! Each manager owns one store and enforces the invariants of its concept.
//! They hold no state besides the store handle and are cheap to clone.

pub mod notifications;
pub mod posts;
pub mod restrictions;
pub mod screen_time;
pub mod sessions;
pub mod users;

pub use notifications::NotificationManager;
pub use posts::{PostManager, PostUpdate};
pub use restrictions::TimeRestrictionManager;
pub use screen_time::ScreenTimeManager;
pub use sessions::SessionManager;
pub use users::{DELETED_USER, UserManager, UserUpdate};

use crate::{KinshipError, Result};

/// Reject blank identifiers and names before they reach storage
pub(crate) fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KinshipError::BadValues(format!("{} cannot be empty!", what)));
    }
    Ok(())
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
