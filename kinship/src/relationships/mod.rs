//! Relationship requests and relations
//!
//! A relationship kind (follow, monitor, ...) is a pair of collections: one
//! holding relation records and one holding the requests that produce them.
//! `RelationshipManager` drives the request state machine for one kind:
//!
//! ```text
//! NONE     --send_request-->    PENDING
//! PENDING  --accept_request-->  ACCEPTED  (+ relation: recipient relates-to sender)
//! PENDING  --reject_request-->  REJECTED
//! PENDING  --cancel_request-->  NONE
//! ACCEPTED --remove_relation--> NONE      (relation and accepted record removed)
//! ```

pub mod errors;
pub mod manager;
pub mod types;

pub use errors::RelationshipError;
pub use manager::RelationshipManager;
pub use types::{RelationshipCollections, RequestState};
