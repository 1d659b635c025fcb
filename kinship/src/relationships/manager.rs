//! Relationship request state machine for one relationship kind

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::errors::RelationshipError;
use super::types::{
    RelationshipCollections, RequestState, new_pending_request, new_relation,
    new_terminal_request,
};
use crate::storage::errors::StorageError;
use crate::storage::filters::{RelationFilter, RequestFilter};
use crate::storage::models::{Relation, RelationRequest, RequestStatus};
use crate::storage::shared_storage::schema::validate_collection_name;
use crate::storage::traits::RelationshipStore;

type Result<T> = std::result::Result<T, RelationshipError>;

/// Orchestrates the request and relation collections of one relationship kind.
///
/// Multi-step operations run as a sequence of single-record writes. When a
/// later step fails, the earlier steps are undone; if undoing fails too the
/// caller gets [`RelationshipError::PartialFailure`].
#[derive(Debug, Clone)]
pub struct RelationshipManager {
    store: Arc<dyn RelationshipStore>,
    collections: RelationshipCollections,
}

impl RelationshipManager {
    /// Create a manager and prepare its collections
    pub async fn new(
        store: Arc<dyn RelationshipStore>,
        collections: RelationshipCollections,
    ) -> Result<Self> {
        let manager = Self { store, collections };

        for name in [&manager.collections.relations, &manager.collections.requests] {
            validate_collection_name(name)
                .map_err(|e| manager.storage_error("prepare", &[name], e))?;
        }
        if manager.collections.relations == manager.collections.requests {
            return Err(manager.storage_error(
                "prepare",
                &[],
                StorageError::Validation(
                    "Relations and requests need separate collections".to_string(),
                ),
            ));
        }

        manager
            .store
            .prepare_relation_collection(&manager.collections.relations)
            .await
            .map_err(|e| manager.storage_error("prepare", &[], e))?;
        manager
            .store
            .prepare_request_collection(&manager.collections.requests)
            .await
            .map_err(|e| manager.storage_error("prepare", &[], e))?;

        info!(
            "{} relationships ready ({} / {})",
            manager.collections.kind, manager.collections.relations, manager.collections.requests
        );
        Ok(manager)
    }

    /// Relationship kind handled by this manager
    pub fn kind(&self) -> &str {
        &self.collections.kind
    }

    /// Collections backing this kind
    pub fn collections(&self) -> &RelationshipCollections {
        &self.collections
    }

    /// Send a request from `from` to `to`.
    ///
    /// Fails with `AlreadyRequested` while a request for the pair is pending and
    /// with `AlreadyRelated` when `to` already relates to `from`. A previous
    /// rejection does not block a new request.
    pub async fn send_request(&self, from: &str, to: &str) -> Result<RelationRequest> {
        self.validate_pair(from, to)?;
        self.ensure_not_requested(from, to).await?;
        self.ensure_not_related(to, from).await?;

        let created = self
            .store
            .create_request(&self.collections.requests, new_pending_request(from, to))
            .await
            .map_err(|e| {
                if e.is_already_exists() {
                    self.already_requested(from, to)
                } else {
                    self.storage_error("send", &[from, to], e)
                }
            })?;

        info!("{} request sent from {} to {}", self.kind(), from, to);
        Ok(created)
    }

    /// Accept the pending request from `from`; `to` now relates-to `from`.
    ///
    /// Steps: claim the pending record, create the relation, record the
    /// acceptance. A failing step undoes the ones before it.
    pub async fn accept_request(&self, from: &str, to: &str) -> Result<Relation> {
        self.validate_pair(from, to)?;
        let pending = self.take_pending(from, to, "accept").await?;

        let relation = match self
            .store
            .create_relation(&self.collections.relations, new_relation(to, from))
            .await
        {
            Ok(relation) => relation,
            Err(e) => {
                let failure = if e.is_already_exists() {
                    self.already_related(to, from)
                } else {
                    self.storage_error("accept", &[from, to], e)
                };
                return Err(self.roll_back("accept", from, to, failure, pending, None).await);
            }
        };

        let accepted = new_terminal_request(from, to, RequestStatus::Accepted);
        if let Err(e) = self
            .store
            .create_request(&self.collections.requests, accepted)
            .await
        {
            let failure = self.storage_error("accept", &[from, to], e);
            return Err(self
                .roll_back("accept", from, to, failure, pending, Some(&relation))
                .await);
        }

        info!(
            "{} request from {} to {} accepted; {} now relates to {}",
            self.kind(),
            from,
            to,
            to,
            from
        );
        Ok(relation)
    }

    /// Reject the pending request from `from`, recording the rejection
    pub async fn reject_request(&self, from: &str, to: &str) -> Result<RelationRequest> {
        self.validate_pair(from, to)?;
        let pending = self.take_pending(from, to, "reject").await?;

        let rejected = new_terminal_request(from, to, RequestStatus::Rejected);
        match self
            .store
            .create_request(&self.collections.requests, rejected)
            .await
        {
            Ok(record) => {
                info!("{} request from {} to {} rejected", self.kind(), from, to);
                Ok(record)
            }
            Err(e) => {
                let failure = self.storage_error("reject", &[from, to], e);
                Err(self.roll_back("reject", from, to, failure, pending, None).await)
            }
        }
    }

    /// Withdraw a pending request without leaving a record behind
    pub async fn cancel_request(&self, from: &str, to: &str) -> Result<RelationRequest> {
        self.validate_pair(from, to)?;
        let removed = self.take_pending(from, to, "cancel").await?;
        info!("{} request from {} to {} cancelled", self.kind(), from, to);
        Ok(removed)
    }

    /// Remove the relation `a` relates-to `b` and the accepted request behind it
    pub async fn remove_relation(&self, a: &str, b: &str) -> Result<Relation> {
        self.validate_pair(a, b)?;

        let removed = self
            .store
            .remove_relation(&self.collections.relations, RelationFilter::pair(a, b))
            .await
            .map_err(|e| self.storage_error("remove", &[a, b], e))?
            .ok_or_else(|| self.relation_not_found(a, b))?;

        // The relation a -> b was created by accepting a request from b to a
        if let Err(e) = self.purge_accepted(b, a).await {
            let cause = e.to_string();
            return match self
                .store
                .create_relation(&self.collections.relations, removed.clone())
                .await
            {
                Ok(_) => Err(self.storage_error("remove", &[a, b], e)),
                Err(restore) if restore.is_already_exists() => {
                    Err(self.storage_error("remove", &[a, b], e))
                }
                Err(restore) => {
                    warn!(
                        "{} relation from {} to {} removed but its history was kept: {}",
                        self.kind(),
                        a,
                        b,
                        restore
                    );
                    Err(RelationshipError::PartialFailure {
                        kind: self.kind().to_string(),
                        operation: "remove",
                        from: a.to_string(),
                        to: b.to_string(),
                        cause,
                        compensation: restore.to_string(),
                    })
                }
            };
        }

        info!("{} relation from {} to {} removed", self.kind(), a, b);
        Ok(removed)
    }

    /// All request records where `identity` is sender or recipient, any status
    pub async fn get_requests(&self, identity: &str) -> Result<Vec<RelationRequest>> {
        self.store
            .list_requests(
                &self.collections.requests,
                RequestFilter::involving(identity),
            )
            .await
            .map_err(|e| self.storage_error("list requests", &[identity], e))
    }

    /// All relations where `identity` is either party
    pub async fn get_relations(&self, identity: &str) -> Result<Vec<Relation>> {
        self.store
            .list_relations(
                &self.collections.relations,
                RelationFilter::involving(identity),
            )
            .await
            .map_err(|e| self.storage_error("list relations", &[identity], e))
    }

    /// Require that `a` relates-to `b`
    pub async fn ensure_related(&self, a: &str, b: &str) -> Result<Relation> {
        self.find_relation(a, b)
            .await?
            .ok_or_else(|| self.relation_not_found(a, b))
    }

    /// Require that `a` does not relate-to `b`
    pub async fn ensure_not_related(&self, a: &str, b: &str) -> Result<()> {
        match self.find_relation(a, b).await? {
            Some(_) => Err(self.already_related(a, b)),
            None => Ok(()),
        }
    }

    /// Require a pending request from `from` to `to`
    pub async fn ensure_requested(&self, from: &str, to: &str) -> Result<RelationRequest> {
        self.find_pending(from, to)
            .await?
            .ok_or_else(|| self.request_not_found(from, to))
    }

    /// Require that no request from `from` to `to` is pending
    pub async fn ensure_not_requested(&self, from: &str, to: &str) -> Result<()> {
        match self.find_pending(from, to).await? {
            Some(_) => Err(self.already_requested(from, to)),
            None => Ok(()),
        }
    }

    /// Whether `a` relates-to `b`
    pub async fn is_related(&self, a: &str, b: &str) -> Result<bool> {
        Ok(self.find_relation(a, b).await?.is_some())
    }

    /// State of the ordered pair, derived from its most recent request record
    pub async fn request_state(&self, from: &str, to: &str) -> Result<RequestState> {
        if self.find_pending(from, to).await?.is_some() {
            return Ok(RequestState::Pending);
        }

        let latest = self
            .store
            .find_request(
                &self.collections.requests,
                RequestFilter::any_status(from, to),
            )
            .await
            .map_err(|e| self.storage_error("read state", &[from, to], e))?;

        Ok(latest.map_or(RequestState::None, |request| request.status.into()))
    }

    async fn find_relation(&self, a: &str, b: &str) -> Result<Option<Relation>> {
        self.store
            .find_relation(&self.collections.relations, RelationFilter::pair(a, b))
            .await
            .map_err(|e| self.storage_error("lookup", &[a, b], e))
    }

    async fn find_pending(&self, from: &str, to: &str) -> Result<Option<RelationRequest>> {
        self.store
            .find_request(
                &self.collections.requests,
                RequestFilter::pair(from, to, RequestStatus::Pending),
            )
            .await
            .map_err(|e| self.storage_error("lookup", &[from, to], e))
    }

    /// Remove the pending record; only one concurrent caller can succeed
    async fn take_pending(
        &self,
        from: &str,
        to: &str,
        operation: &'static str,
    ) -> Result<RelationRequest> {
        self.store
            .remove_request(
                &self.collections.requests,
                RequestFilter::pair(from, to, RequestStatus::Pending),
            )
            .await
            .map_err(|e| self.storage_error(operation, &[from, to], e))?
            .ok_or_else(|| self.request_not_found(from, to))
    }

    async fn purge_accepted(&self, from: &str, to: &str) -> std::result::Result<(), StorageError> {
        let filter = RequestFilter::pair(from, to, RequestStatus::Accepted);
        while let Some(purged) = self
            .store
            .remove_request(&self.collections.requests, filter.clone())
            .await?
        {
            debug!("Purged accepted {} request {}", self.kind(), purged.id);
        }
        Ok(())
    }

    /// Undo the completed steps of a failed accept/reject.
    ///
    /// Returns `failure` when the store is back in its prior state and
    /// `PartialFailure` otherwise.
    async fn roll_back(
        &self,
        operation: &'static str,
        from: &str,
        to: &str,
        failure: RelationshipError,
        pending: RelationRequest,
        relation: Option<&Relation>,
    ) -> RelationshipError {
        let mut compensation_errors = Vec::new();

        if let Some(relation) = relation {
            if let Err(e) = self
                .store
                .remove_relation(
                    &self.collections.relations,
                    RelationFilter::pair(&relation.from, &relation.to),
                )
                .await
            {
                compensation_errors.push(format!("relation not removed: {}", e));
            }
        }

        match self
            .store
            .create_request(&self.collections.requests, pending)
            .await
        {
            Ok(_) => {}
            // A new request for the pair was sent in the meantime
            Err(e) if e.is_already_exists() => {}
            Err(e) => compensation_errors.push(format!("pending request not restored: {}", e)),
        }

        if compensation_errors.is_empty() {
            debug!(
                "{} {} from {} to {} rolled back",
                self.kind(),
                operation,
                from,
                to
            );
            return failure;
        }

        warn!(
            "{} {} from {} to {} left partially applied: {}",
            self.kind(),
            operation,
            from,
            to,
            compensation_errors.join("; ")
        );
        RelationshipError::PartialFailure {
            kind: self.kind().to_string(),
            operation,
            from: from.to_string(),
            to: to.to_string(),
            cause: failure.to_string(),
            compensation: compensation_errors.join("; "),
        }
    }

    fn validate_pair(&self, from: &str, to: &str) -> Result<()> {
        let message = if from.trim().is_empty() || to.trim().is_empty() {
            "Identities cannot be empty!".to_string()
        } else if from == to {
            format!("{} request from {} to themself is not allowed!", self.kind(), from)
        } else {
            return Ok(());
        };

        Err(RelationshipError::BadValues {
            kind: self.kind().to_string(),
            from: from.to_string(),
            to: to.to_string(),
            message,
        })
    }

    fn storage_error(
        &self,
        operation: &'static str,
        parties: &[&str],
        source: StorageError,
    ) -> RelationshipError {
        RelationshipError::Storage {
            kind: self.kind().to_string(),
            operation,
            parties: parties.iter().map(|p| p.to_string()).collect(),
            source,
        }
    }

    fn already_requested(&self, from: &str, to: &str) -> RelationshipError {
        RelationshipError::AlreadyRequested {
            kind: self.kind().to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    fn already_related(&self, from: &str, to: &str) -> RelationshipError {
        RelationshipError::AlreadyRelated {
            kind: self.kind().to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    fn request_not_found(&self, from: &str, to: &str) -> RelationshipError {
        RelationshipError::RequestNotFound {
            kind: self.kind().to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    fn relation_not_found(&self, from: &str, to: &str) -> RelationshipError {
        RelationshipError::RelationNotFound {
            kind: self.kind().to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
