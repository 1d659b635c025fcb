//! Post storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, RecordId};

use super::base::SharedStorage;
use super::{where_clause, write_error};
use crate::storage::errors::StorageError;
use crate::storage::filters::PostFilter;
use crate::storage::models::{Post, PostOptions};
use crate::storage::traits::PostStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealPost {
    key: String,
    author_id: String,
    content: String,
    options: Option<PostOptions>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Post> for SurrealPost {
    fn from(post: Post) -> Self {
        Self {
            key: post.id,
            author_id: post.author,
            content: post.content,
            options: post.options,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<SurrealPost> for Post {
    fn from(record: SurrealPost) -> Self {
        Self {
            id: record.key,
            author: record.author_id,
            content: record.content,
            options: record.options,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct PostPatch {
    content: String,
    options: Option<PostOptions>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl<C> PostStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_post(&self, post: Post) -> Result<Post, StorageError> {
        let record_id = RecordId::from(("post", post.id.as_str()));
        let created: Option<SurrealPost> = self
            .client
            .create(record_id)
            .content(SurrealPost::from(post))
            .await
            .map_err(|e| write_error("Failed to create post", e))?;

        created
            .map(Post::from)
            .ok_or_else(|| StorageError::Other("No post created".to_string()))
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>, StorageError> {
        let record: Option<SurrealPost> = self
            .client
            .select(RecordId::from(("post", id)))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get post: {}", e)))?;

        Ok(record.map(Post::from))
    }

    async fn update_post(&self, post: Post) -> Result<Post, StorageError> {
        let patch = PostPatch {
            content: post.content,
            options: post.options,
            updated_at: Utc::now(),
        };

        let updated: Option<SurrealPost> = self
            .client
            .update(RecordId::from(("post", post.id.as_str())))
            .merge(patch)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update post: {}", e)))?;

        updated
            .map(Post::from)
            .ok_or_else(|| StorageError::NotFound(format!("Post {} not found", post.id)))
    }

    async fn delete_post(&self, id: &str) -> Result<bool, StorageError> {
        let deleted: Option<SurrealPost> = self
            .client
            .delete(RecordId::from(("post", id)))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete post: {}", e)))?;

        Ok(deleted.is_some())
    }

    async fn list_posts(&self, filter: Option<PostFilter>) -> Result<Vec<Post>, StorageError> {
        let filter = filter.unwrap_or_default();

        let mut conditions = Vec::new();
        if filter.author.is_some() {
            conditions.push("author_id = $author");
        }
        if filter.content_contains.is_some() {
            conditions.push("string::contains(string::lowercase(content), $needle)");
        }
        let query = format!("SELECT * FROM post{}", where_clause(&conditions));

        let mut response = self
            .client
            .query(query)
            .bind(("author", filter.author))
            .bind((
                "needle",
                filter.content_contains.map(|needle| needle.to_lowercase()),
            ))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list posts: {}", e)))?;

        let records: Vec<SurrealPost> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to parse posts: {}", e)))?;

        let mut posts: Vec<Post> = records.into_iter().map(Post::from).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }
}
