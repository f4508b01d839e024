//! Service layer over the repository traits.
//!
//! Handlers call these functions rather than the repository directly so the
//! logging around each store call lives in one place.

use tracing::{debug, info};

use super::repository::{FullRepository, RepositoryResult};
use crate::models::{Comment, NewComment, NewPost, Post, PostId};

/// Check if the repository connection is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Post Operations ====================

/// Persist a new post and return the stored record.
pub async fn create_post<R: FullRepository + ?Sized>(
    repo: &R,
    post: &NewPost,
) -> RepositoryResult<Post> {
    let stored = repo.create_post(post).await?;
    info!(post_id = %stored.id, user = %stored.user_name, "Service layer: created post");
    Ok(stored)
}

pub async fn list_posts<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Post>> {
    debug!("Service layer: listing all posts");
    repo.list_posts().await
}

/// Fetch a single post. A missing post is `Ok(None)`.
pub async fn get_post<R: FullRepository + ?Sized>(
    repo: &R,
    post_id: PostId,
) -> RepositoryResult<Option<Post>> {
    let post = repo.get_post(post_id).await?;
    if post.is_none() {
        debug!(%post_id, "Service layer: post not found");
    }
    Ok(post)
}

// ==================== Comment Operations ====================

pub async fn create_comment<R: FullRepository + ?Sized>(
    repo: &R,
    comment: &NewComment,
) -> RepositoryResult<Comment> {
    let stored = repo.create_comment(comment).await?;
    info!(
        comment_id = %stored.id,
        post_id = ?stored.post_id.map(|id| id.value()),
        "Service layer: created comment"
    );
    Ok(stored)
}

/// List the comments attached to `post_id`. Unknown posts give an empty list.
pub async fn list_comments_by_post<R: FullRepository + ?Sized>(
    repo: &R,
    post_id: PostId,
) -> RepositoryResult<Vec<Comment>> {
    debug!(%post_id, "Service layer: listing comments");
    repo.list_comments_by_post(post_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;

    #[tokio::test]
    async fn test_services_work_through_trait_object() {
        let repo: std::sync::Arc<dyn FullRepository> = std::sync::Arc::new(LocalRepository::new());

        let post = create_post(repo.as_ref(), &NewPost::new("Hello", "World", "alice"))
            .await
            .unwrap();
        create_comment(repo.as_ref(), &NewComment::new("nice post", Some(post.id)))
            .await
            .unwrap();

        assert_eq!(list_posts(repo.as_ref()).await.unwrap().len(), 1);
        assert_eq!(
            list_comments_by_post(repo.as_ref(), post.id).await.unwrap().len(),
            1
        );
        assert!(health_check(repo.as_ref()).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_post_is_none() {
        let repo = LocalRepository::new();
        assert!(get_post(&repo, PostId::new(999)).await.unwrap().is_none());
    }
}
