//! Relation and request storage implementation
//!
//! Records are keyed by the id chosen by the caller. A second create with the
//! same id fails, which is what makes "insert if absent" atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, RecordId};

use super::base::SharedStorage;
use super::{where_clause, write_error};
use crate::storage::errors::StorageError;
use crate::storage::filters::{RelationFilter, RequestFilter};
use crate::storage::models::{Relation, RelationRequest, RequestStatus};
use crate::storage::traits::{RelationStore, RequestStore};

/// Internal representation of a relation record for SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealRelation {
    key: String,
    from_id: String,
    to_id: String,
    created_at: DateTime<Utc>,
}

impl From<Relation> for SurrealRelation {
    fn from(relation: Relation) -> Self {
        Self {
            key: relation.id,
            from_id: relation.from,
            to_id: relation.to,
            created_at: relation.created_at,
        }
    }
}

impl From<SurrealRelation> for Relation {
    fn from(record: SurrealRelation) -> Self {
        Self {
            id: record.key,
            from: record.from_id,
            to: record.to_id,
            created_at: record.created_at,
        }
    }
}

/// Internal representation of a request record for SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealRequest {
    key: String,
    from_id: String,
    to_id: String,
    status: RequestStatus,
    created_at: DateTime<Utc>,
}

impl From<RelationRequest> for SurrealRequest {
    fn from(request: RelationRequest) -> Self {
        Self {
            key: request.id,
            from_id: request.from,
            to_id: request.to,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

impl From<SurrealRequest> for RelationRequest {
    fn from(record: SurrealRequest) -> Self {
        Self {
            id: record.key,
            from: record.from_id,
            to: record.to_id,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

fn relation_conditions(filter: &RelationFilter) -> String {
    let mut conditions = Vec::new();
    if filter.from.is_some() {
        conditions.push("from_id = $from");
    }
    if filter.to.is_some() {
        conditions.push("to_id = $to");
    }
    if filter.involving.is_some() {
        conditions.push("(from_id = $involving OR to_id = $involving)");
    }
    where_clause(&conditions)
}

fn request_conditions(filter: &RequestFilter) -> String {
    let mut conditions = Vec::new();
    if filter.from.is_some() {
        conditions.push("from_id = $from");
    }
    if filter.to.is_some() {
        conditions.push("to_id = $to");
    }
    if filter.status.is_some() {
        conditions.push("status = $status");
    }
    if filter.involving.is_some() {
        conditions.push("(from_id = $involving OR to_id = $involving)");
    }
    where_clause(&conditions)
}

impl<C> SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn query_relations(
        &self,
        collection: &str,
        filter: RelationFilter,
    ) -> Result<Vec<Relation>, StorageError> {
        let query = format!(
            "SELECT * FROM type::table($table){}",
            relation_conditions(&filter)
        );

        let mut response = self
            .client
            .query(query)
            .bind(("table", collection.to_string()))
            .bind(("from", filter.from))
            .bind(("to", filter.to))
            .bind(("involving", filter.involving))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to query relations: {}", e)))?;

        let records: Vec<SurrealRelation> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to parse relations: {}", e)))?;

        let mut relations: Vec<Relation> = records.into_iter().map(Relation::from).collect();
        relations.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(relations)
    }

    async fn query_requests(
        &self,
        collection: &str,
        filter: RequestFilter,
    ) -> Result<Vec<RelationRequest>, StorageError> {
        let query = format!(
            "SELECT * FROM type::table($table){}",
            request_conditions(&filter)
        );

        let mut response = self
            .client
            .query(query)
            .bind(("table", collection.to_string()))
            .bind(("from", filter.from))
            .bind(("to", filter.to))
            .bind(("status", filter.status.map(|s| s.as_str().to_string())))
            .bind(("involving", filter.involving))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to query requests: {}", e)))?;

        let records: Vec<SurrealRequest> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to parse requests: {}", e)))?;

        let mut requests: Vec<RelationRequest> =
            records.into_iter().map(RelationRequest::from).collect();
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(requests)
    }
}

#[async_trait]
impl<C> RelationStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn prepare_relation_collection(&self, collection: &str) -> Result<(), StorageError> {
        self.ensure_collection(collection, true).await
    }

    async fn create_relation(
        &self,
        collection: &str,
        relation: Relation,
    ) -> Result<Relation, StorageError> {
        self.ensure_collection(collection, true).await?;

        let record_id = RecordId::from((collection, relation.id.as_str()));
        let created: Option<SurrealRelation> = self
            .client
            .create(record_id)
            .content(SurrealRelation::from(relation))
            .await
            .map_err(|e| write_error("Failed to create relation", e))?;

        created
            .map(Relation::from)
            .ok_or_else(|| StorageError::Other("No relation created".to_string()))
    }

    async fn find_relation(
        &self,
        collection: &str,
        filter: RelationFilter,
    ) -> Result<Option<Relation>, StorageError> {
        Ok(self
            .query_relations(collection, filter)
            .await?
            .into_iter()
            .next())
    }

    async fn list_relations(
        &self,
        collection: &str,
        filter: RelationFilter,
    ) -> Result<Vec<Relation>, StorageError> {
        self.query_relations(collection, filter).await
    }

    async fn remove_relation(
        &self,
        collection: &str,
        filter: RelationFilter,
    ) -> Result<Option<Relation>, StorageError> {
        let Some(found) = self.find_relation(collection, filter).await? else {
            return Ok(None);
        };

        // Only the caller whose delete returns the record has removed it
        let removed: Option<SurrealRelation> = self
            .client
            .delete(RecordId::from((collection, found.id.as_str())))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to remove relation: {}", e)))?;

        Ok(removed.map(Relation::from))
    }
}

#[async_trait]
impl<C> RequestStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn prepare_request_collection(&self, collection: &str) -> Result<(), StorageError> {
        self.ensure_collection(collection, false).await
    }

    async fn create_request(
        &self,
        collection: &str,
        request: RelationRequest,
    ) -> Result<RelationRequest, StorageError> {
        self.ensure_collection(collection, false).await?;

        let record_id = RecordId::from((collection, request.id.as_str()));
        let created: Option<SurrealRequest> = self
            .client
            .create(record_id)
            .content(SurrealRequest::from(request))
            .await
            .map_err(|e| write_error("Failed to create request", e))?;

        created
            .map(RelationRequest::from)
            .ok_or_else(|| StorageError::Other("No request created".to_string()))
    }

    async fn find_request(
        &self,
        collection: &str,
        filter: RequestFilter,
    ) -> Result<Option<RelationRequest>, StorageError> {
        Ok(self.query_requests(collection, filter).await?.pop())
    }

    async fn list_requests(
        &self,
        collection: &str,
        filter: RequestFilter,
    ) -> Result<Vec<RelationRequest>, StorageError> {
        self.query_requests(collection, filter).await
    }

    async fn remove_request(
        &self,
        collection: &str,
        filter: RequestFilter,
    ) -> Result<Option<RelationRequest>, StorageError> {
        let Some(found) = self.find_request(collection, filter).await? else {
            return Ok(None);
        };

        let removed: Option<SurrealRequest> = self
            .client
            .delete(RecordId::from((collection, found.id.as_str())))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to remove request: {}", e)))?;

        Ok(removed.map(RelationRequest::from))
    }
}
