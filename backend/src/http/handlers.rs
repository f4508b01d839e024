//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for the single store call it makes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::Uri,
    Json,
};
use serde_json::Value;

use super::dto::{
    Comment, CreateCommentRequest, CreatePostRequest, HealthResponse, Post,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::PostId;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Path prefix of the single-post lookup segment, as in `/posts/byID42`.
pub const BY_ID_PREFIX: &str = "byID";

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Posts
// =============================================================================

/// GET /posts
pub async fn list_posts(State(state): State<AppState>) -> HandlerResult<Vec<Post>> {
    let posts = db_services::list_posts(state.repository.as_ref()).await?;
    Ok(Json(posts))
}

/// GET /posts/byID{id}
///
/// Responds with `null` when no post has the id.
pub async fn get_post_by_id(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> HandlerResult<Option<Post>> {
    let post_id = parse_by_id_segment(&segment)
        .ok_or_else(|| AppError::NotFound(format!("No route for /posts/{}", segment)))?;

    let post = db_services::get_post(state.repository.as_ref(), post_id).await?;
    Ok(Json(post))
}

/// POST /posts
///
/// Stores the post and echoes the submitted payload.
pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<Value> {
    let Json(payload) = payload?;
    let new_post = CreatePostRequest::from_payload(&payload)?.into_new_post()?;

    db_services::create_post(state.repository.as_ref(), &new_post).await?;
    Ok(Json(payload))
}

/// Parse `byID42` (or `byID:42`) into a post id.
pub fn parse_by_id_segment(segment: &str) -> Option<PostId> {
    let rest = segment.strip_prefix(BY_ID_PREFIX)?;
    let digits = rest.strip_prefix(':').unwrap_or(rest);
    digits.parse().ok()
}

// =============================================================================
// Comments
// =============================================================================

/// GET /comments/{post_id}
///
/// Unknown posts yield an empty list.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> HandlerResult<Vec<Comment>> {
    let post_id: PostId = post_id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid post id: {}", post_id)))?;

    let comments = db_services::list_comments_by_post(state.repository.as_ref(), post_id).await?;
    Ok(Json(comments))
}

/// POST /comments
///
/// Stores the comment and echoes the submitted payload.
pub async fn create_comment(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<Value> {
    let Json(payload) = payload?;
    let new_comment = CreateCommentRequest::from_payload(&payload)?.into_new_comment()?;

    db_services::create_comment(state.repository.as_ref(), &new_comment).await?;
    Ok(Json(payload))
}

// =============================================================================
// Fallback
// =============================================================================

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_id_segment() {
        assert_eq!(parse_by_id_segment("byID7"), Some(PostId::new(7)));
        assert_eq!(parse_by_id_segment("byID:999"), Some(PostId::new(999)));
        assert_eq!(parse_by_id_segment("byID"), None);
        assert_eq!(parse_by_id_segment("byIDabc"), None);
        assert_eq!(parse_by_id_segment("7"), None);
    }
}
