//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Optional retry for transient failures (disabled by default)
//! - Automatic migration execution and schema verification at startup
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 0)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::{Bool, Text};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;
use tracing::{debug, info, warn};

use crate::db::repository::{
    CommentRepository, ErrorContext, PostRepository, RepositoryError, RepositoryResult,
};
use crate::models::{Comment, ModelRegistry, NewComment, NewPost, Post, PostId};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 0,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the variables read.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

#[derive(QueryableByName)]
struct TablePresence {
    #[diesel(sql_type = Bool)]
    present: bool,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository, run pending migrations and verify that every
    /// registered table exists.
    ///
    /// Fails when the database is unreachable; callers treat that as fatal.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
            Self::verify_schema(&mut conn, &ModelRegistry::blog())?;
        }

        info!(max_pool_size = config.max_pool_size, "Postgres repository ready");

        Ok(Self { pool, config })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        for version in applied {
            info!(%version, "applied migration");
        }

        Ok(())
    }

    /// Check the registered tables exist, in registration order.
    fn verify_schema(conn: &mut PgConnection, registry: &ModelRegistry) -> RepositoryResult<()> {
        registry.validate().map_err(|e| {
            RepositoryError::internal_with_context(e.to_string(), ErrorContext::new("verify_schema"))
        })?;

        for table in registry.table_order() {
            let presence: TablePresence = sql_query("SELECT to_regclass($1) IS NOT NULL AS present")
                .bind::<Text, _>(table)
                .get_result(conn)
                .map_err(RepositoryError::from)?;
            if !presence.present {
                return Err(RepositoryError::internal_with_context(
                    format!("table '{}' is missing after migrations", table),
                    ErrorContext::new("verify_schema").with_entity(table),
                ));
            }
            debug!(table, "verified table");
        }

        Ok(())
    }

    /// Execute a database operation on the blocking pool, retrying transient
    /// failures up to `max_retries` times with exponential backoff.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut retry_delay = Duration::from_millis(retry_delay_ms);
            let mut attempt = 0;

            loop {
                let result = pool
                    .get()
                    .map_err(|e| {
                        RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new(operation)
                                .with_details(format!("attempt={}", attempt + 1)),
                        )
                    })
                    .and_then(|mut conn| f.clone()(&mut conn));

                match result {
                    Ok(value) => return Ok(value),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        warn!(operation, attempt, error = %e, "retrying database operation");
                        std::thread::sleep(retry_delay);
                        retry_delay *= 2;
                        attempt += 1;
                    }
                    Err(e) => return Err(e.with_operation(operation)),
                }
            }
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

#[async_trait]
impl PostRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        post.validate()
            .map_err(|e| RepositoryError::from(e).with_operation("create_post"))?;

        let post = post.clone();
        self.with_conn("create_post", move |conn| {
            let row: PostRow = diesel::insert_into(posts::table)
                .values(NewPostRow::from(&post))
                .returning(PostRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
        .await
    }

    async fn list_posts(&self) -> RepositoryResult<Vec<Post>> {
        self.with_conn("list_posts", |conn| {
            let rows = posts::table
                .select(PostRow::as_select())
                .order(posts::id.asc())
                .load::<PostRow>(conn)?;
            Ok(rows.into_iter().map(Post::from).collect())
        })
        .await
    }

    async fn get_post(&self, post_id: PostId) -> RepositoryResult<Option<Post>> {
        self.with_conn("get_post", move |conn| {
            let row = posts::table
                .find(post_id.value())
                .select(PostRow::as_select())
                .first::<PostRow>(conn)
                .optional()?;
            Ok(row.map(Post::from))
        })
        .await
    }

    async fn delete_post(&self, post_id: PostId) -> RepositoryResult<bool> {
        // comments.post_id carries ON DELETE CASCADE
        self.with_conn("delete_post", move |conn| {
            let deleted = diesel::delete(posts::table.find(post_id.value())).execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }
}

#[async_trait]
impl CommentRepository for PostgresRepository {
    async fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        comment
            .validate()
            .map_err(|e| RepositoryError::from(e).with_operation("create_comment"))?;

        let comment = comment.clone();
        self.with_conn("create_comment", move |conn| {
            let row: CommentRow = diesel::insert_into(comments::table)
                .values(NewCommentRow::from(&comment))
                .returning(CommentRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
        .await
    }

    async fn list_comments_by_post(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>> {
        self.with_conn("list_comments_by_post", move |conn| {
            let rows = comments::table
                .filter(comments::post_id.eq(post_id.value()))
                .select(CommentRow::as_select())
                .order(comments::id.asc())
                .load::<CommentRow>(conn)?;
            Ok(rows.into_iter().map(Comment::from).collect())
        })
        .await
    }
}
