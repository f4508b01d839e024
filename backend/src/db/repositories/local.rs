//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. All data is stored in
//! memory using `BTreeMap`s keyed by id, so listings come back in ascending id
//! order just like the Postgres backend.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::db::repository::{
    CommentRepository, ErrorContext, PostRepository, RepositoryError, RepositoryResult,
};
use crate::models::{Comment, CommentId, ModelRegistry, NewComment, NewPost, Post, PostId};

/// Table holding comments, the only child table kept in memory.
const COMMENTS_TABLE: &str = "comments";

/// In-memory local repository.
///
/// Cloning is cheap and every clone shares the same underlying data.
///
/// # Example
/// ```
/// use blog_backend::db::repositories::LocalRepository;
/// use blog_backend::db::repository::PostRepository;
/// use blog_backend::models::NewPost;
///
/// # tokio_test_block_on(async {
/// let repo = LocalRepository::new();
/// repo.create_post(&NewPost::new("Hello", "World", "alice")).await.unwrap();
/// assert_eq!(repo.post_count(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    registry: Arc<ModelRegistry>,
}

struct LocalData {
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,

    // ID counters
    next_post_id: i64,
    next_comment_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            posts: BTreeMap::new(),
            comments: BTreeMap::new(),
            next_post_id: 1,
            next_comment_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository using the blog model registry.
    pub fn new() -> Self {
        Self::with_registry(ModelRegistry::blog())
    }

    /// Create a repository whose delete behaviour follows `registry`.
    pub fn with_registry(registry: ModelRegistry) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            registry: Arc::new(registry),
        }
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository. Id counters restart at 1.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn post_count(&self) -> usize {
        self.data.read().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.data.read().comments.len()
    }

    fn ensure_healthy(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if data.is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "local repository marked unhealthy",
                ErrorContext::new(operation),
            ))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        post.validate()
            .map_err(|e| RepositoryError::from(e).with_operation("create_post"))?;

        let mut data = self.data.write();
        Self::ensure_healthy(&data, "create_post")?;

        let id = PostId::new(data.next_post_id);
        data.next_post_id += 1;

        let now = Utc::now();
        let record = Post {
            id,
            title: post.title.clone(),
            post_text: post.post_text.clone(),
            user_name: post.user_name.clone(),
            created_at: now,
            updated_at: now,
        };
        data.posts.insert(id, record.clone());
        debug!(post_id = %id, "stored post in memory");

        Ok(record)
    }

    async fn list_posts(&self) -> RepositoryResult<Vec<Post>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "list_posts")?;
        Ok(data.posts.values().cloned().collect())
    }

    async fn get_post(&self, post_id: PostId) -> RepositoryResult<Option<Post>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "get_post")?;
        Ok(data.posts.get(&post_id).cloned())
    }

    async fn delete_post(&self, post_id: PostId) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "delete_post")?;

        if !data.posts.contains_key(&post_id) {
            return Ok(false);
        }

        // An association without an in-memory table leaves the store untouched.
        let child_tables = self
            .registry
            .children_of("Post")
            .map(|assoc| {
                self.registry
                    .entity(assoc.child)
                    .map(|entity| entity.table)
                    .filter(|table| *table == COMMENTS_TABLE)
                    .ok_or_else(|| {
                        RepositoryError::internal_with_context(
                            format!("no in-memory table for entity '{}'", assoc.child),
                            ErrorContext::new("delete_post")
                                .with_entity("post")
                                .with_entity_id(post_id),
                        )
                    })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        let owner = Some(post_id);
        for table in child_tables {
            let before = data.comments.len();
            data.comments.retain(|_, c| c.post_id != owner);
            debug!(table, removed = before - data.comments.len(), "cascaded delete");
        }

        data.posts.remove(&post_id);
        debug!(post_id = %post_id, "deleted post from memory");
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for LocalRepository {
    async fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        comment
            .validate()
            .map_err(|e| RepositoryError::from(e).with_operation("create_comment"))?;

        let mut data = self.data.write();
        Self::ensure_healthy(&data, "create_comment")?;

        let id = CommentId::new(data.next_comment_id);
        data.next_comment_id += 1;

        let now = Utc::now();
        let record = Comment {
            id,
            comment_body: comment.comment_body.clone(),
            post_id: comment.post_id,
            created_at: now,
            updated_at: now,
        };
        data.comments.insert(id, record.clone());

        Ok(record)
    }

    async fn list_comments_by_post(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "list_comments_by_post")?;
        Ok(data
            .comments
            .values()
            .filter(|c| c.post_id == Some(post_id))
            .cloned()
            .collect())
    }
}
