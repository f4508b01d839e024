//! Integration tests against a live Postgres database.
//!
//! Skipped unless `TEST_DATABASE_URL` points at a disposable database. The
//! tests create their own rows and only assert on those.

#![cfg(feature = "postgres-repo")]

use blog_backend::db::factory::RepositoryFactory;
use blog_backend::db::repository::{CommentRepository, PostRepository};
use blog_backend::db::PostgresConfig;
use blog_backend::models::{NewComment, NewPost, PostId};

async fn repository() -> Option<std::sync::Arc<blog_backend::db::PostgresRepository>> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping Postgres test");
            return None;
        }
    };
    Some(
        RepositoryFactory::create_postgres(&PostgresConfig::with_url(url))
            .await
            .unwrap(),
    )
}

#[tokio::test]
async fn test_postgres_post_lifecycle() {
    let Some(repo) = repository().await else {
        return;
    };
    assert!(repo.health_check().await.unwrap());

    let created = repo
        .create_post(&NewPost::new("pg title", "pg body", "pg-user"))
        .await
        .unwrap();
    let fetched = repo.get_post(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.post_text, "pg body");

    let listed = repo.list_posts().await.unwrap();
    assert!(listed.iter().any(|p| p.id == created.id));

    assert!(repo.delete_post(created.id).await.unwrap());
    assert!(repo.get_post(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_postgres_delete_cascades_comments() {
    let Some(repo) = repository().await else {
        return;
    };

    let post = repo
        .create_post(&NewPost::new("cascade", "body", "pg-user"))
        .await
        .unwrap();
    repo.create_comment(&NewComment::new("goes away", Some(post.id)))
        .await
        .unwrap();
    assert_eq!(repo.list_comments_by_post(post.id).await.unwrap().len(), 1);

    repo.delete_post(post.id).await.unwrap();
    assert!(repo.list_comments_by_post(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_postgres_rejects_empty_fields_and_dangling_post() {
    let Some(repo) = repository().await else {
        return;
    };

    let err = repo
        .create_post(&NewPost::new("", "body", "pg-user"))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = repo
        .create_comment(&NewComment::new("dangling", Some(PostId::new(i64::MAX))))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}
