//! Posts

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::{new_id, require_non_empty};
use crate::storage::filters::PostFilter;
use crate::storage::models::{Post, PostOptions};
use crate::storage::traits::PostStore;
use crate::{KinshipError, Result};

/// Changes applied by [`PostManager::update`]
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub content: Option<String>,
    pub options: Option<PostOptions>,
}

#[derive(Debug, Clone)]
pub struct PostManager {
    store: Arc<dyn PostStore>,
}

impl PostManager {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        author: &str,
        content: &str,
        options: Option<PostOptions>,
    ) -> Result<Post> {
        require_non_empty(author, "Author")?;
        require_non_empty(content, "Post content")?;

        let now = Utc::now();
        let post = Post {
            id: new_id(),
            author: author.to_string(),
            content: content.to_string(),
            options,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.create_post(post).await?;
        info!("Post {} created by {}", created.id, author);
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<Post> {
        self.store
            .get_post(id)
            .await?
            .ok_or_else(|| post_not_found(id))
    }

    /// All posts, newest first
    pub async fn get_posts(&self) -> Result<Vec<Post>> {
        Ok(self.store.list_posts(None).await?)
    }

    /// Posts written by `author`, newest first
    pub async fn get_by_author(&self, author: &str) -> Result<Vec<Post>> {
        let filter = PostFilter {
            author: Some(author.to_string()),
            ..Default::default()
        };
        Ok(self.store.list_posts(Some(filter)).await?)
    }

    /// Posts whose content contains every whitespace-separated keyword,
    /// ignoring case
    pub async fn search(&self, query: &str) -> Result<Vec<Post>> {
        let keywords: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let Some((first, rest)) = keywords.split_first() else {
            return Err(KinshipError::BadValues(
                "Search query cannot be empty!".to_string(),
            ));
        };

        let filter = PostFilter {
            content_contains: Some(first.clone()),
            ..Default::default()
        };
        let posts = self.store.list_posts(Some(filter)).await?;

        Ok(posts
            .into_iter()
            .filter(|post| {
                let content = post.content.to_lowercase();
                rest.iter().all(|keyword| content.contains(keyword.as_str()))
            })
            .collect())
    }

    pub async fn update(&self, id: &str, update: PostUpdate) -> Result<Post> {
        let mut post = self.get(id).await?;

        if let Some(content) = update.content {
            require_non_empty(&content, "Post content")?;
            post.content = content;
        }
        if let Some(options) = update.options {
            post.options = Some(options);
        }
        post.updated_at = Utc::now();

        let updated = self.store.update_post(post).await?;
        info!("Post {} updated", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete_post(id).await? {
            return Err(post_not_found(id));
        }
        info!("Post {} deleted", id);
        Ok(())
    }

    /// Require that `user` wrote the post
    pub async fn ensure_author(&self, user: &str, id: &str) -> Result<()> {
        let post = self.get(id).await?;
        if post.author != user {
            return Err(KinshipError::NotAllowed(format!(
                "{} is not the author of post {}!",
                user, id
            )));
        }
        Ok(())
    }
}

fn post_not_found(id: &str) -> KinshipError {
    KinshipError::NotFound(format!("Post {} does not exist!", id))
}
