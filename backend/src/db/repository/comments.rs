//! Comment repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Comment, NewComment, PostId};

/// Repository trait for comment operations.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a new comment.
    ///
    /// The post reference is stored as given; it is not checked against the
    /// posts table by the in-memory backend.
    async fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment>;

    /// List comments whose `PostID` equals `post_id`, in ascending id order.
    ///
    /// An unknown post yields an empty vector, not an error.
    async fn list_comments_by_post(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>>;
}
