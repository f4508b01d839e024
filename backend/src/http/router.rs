//! Router configuration for the HTTP API.
//!
//! Requests are dispatched by path prefix: `/posts` to the post handlers and
//! `/comments` to the comment handlers. CORS, compression and request tracing
//! wrap every route.

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

fn posts_collection() -> MethodRouter<AppState> {
    get(handlers::list_posts).post(handlers::create_post)
}

fn comments_collection() -> MethodRouter<AppState> {
    post(handlers::create_comment)
}

// Collection paths answer with and without a trailing slash.
fn posts_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", posts_collection())
        .route("/posts/", posts_collection())
        .route("/posts/{segment}", get(handlers::get_post_by_id))
}

fn comments_routes() -> Router<AppState> {
    Router::new()
        .route("/comments", comments_collection())
        .route("/comments/", comments_collection())
        .route("/comments/{post_id}", get(handlers::list_comments))
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Cross-origin requests are accepted from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(posts_routes())
        .merge(comments_routes())
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
