//! Post repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewPost, Post, PostId};

/// Repository trait for post operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust and allow
/// sharing across request handlers.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Check if the store connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert a new post. The store assigns the id and both timestamps.
    ///
    /// # Returns
    /// * `Ok(Post)` - The persisted record
    /// * `Err(RepositoryError::ValidationError)` - If a required field is empty;
    ///   nothing is written in that case
    async fn create_post(&self, post: &NewPost) -> RepositoryResult<Post>;

    /// List every post in ascending id order.
    async fn list_posts(&self) -> RepositoryResult<Vec<Post>>;

    /// Look a post up by primary key.
    ///
    /// # Returns
    /// * `Ok(None)` - If no post has this id
    async fn get_post(&self, post_id: PostId) -> RepositoryResult<Option<Post>>;

    /// Delete a post together with all of its comments.
    ///
    /// # Returns
    /// * `Ok(true)` if a post was deleted, `Ok(false)` if none matched
    async fn delete_post(&self, post_id: PostId) -> RepositoryResult<bool>;
}
