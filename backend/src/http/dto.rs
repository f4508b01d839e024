//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies are decoded from the raw JSON value into these explicit
//! schemas before anything reaches the repository.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::AppError;
use crate::models::{NewComment, NewPost, PostId};

pub use crate::models::{Comment, Post};

/// Request body for `POST /posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub post_text: String,
    pub user_name: String,
}

/// Request body for `POST /comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub comment_body: String,
    #[serde(rename = "PostID", default)]
    pub post_id: Option<PostId>,
}

/// Decode `payload` into a request schema, reporting missing or mistyped
/// fields as validation errors.
fn decode<T: serde::de::DeserializeOwned>(payload: &Value) -> Result<T, AppError> {
    if !payload.is_object() {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }

    T::deserialize(payload).map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })
}

impl CreatePostRequest {
    pub fn from_payload(payload: &Value) -> Result<Self, AppError> {
        decode(payload)
    }

    /// Check field constraints and convert into the model type.
    pub fn into_new_post(self) -> Result<NewPost, AppError> {
        let post = NewPost::new(self.title, self.post_text, self.user_name);
        post.validate()?;
        Ok(post)
    }
}

impl CreateCommentRequest {
    pub fn from_payload(payload: &Value) -> Result<Self, AppError> {
        decode(payload)
    }

    pub fn into_new_comment(self) -> Result<NewComment, AppError> {
        let comment = NewComment::new(self.comment_body, self.post_id);
        comment.validate()?;
        Ok(comment)
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_post_request_missing_field() {
        let err = CreatePostRequest::from_payload(&json!({"title": "Hello", "userName": "alice"}))
            .unwrap_err();
        match err {
            AppError::Validation { message, .. } => assert!(message.contains("postText")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_create_post_request_null_field() {
        let payload = json!({"title": "Hello", "postText": null, "userName": "alice"});
        assert!(matches!(
            CreatePostRequest::from_payload(&payload),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_create_post_request_empty_field() {
        let payload = json!({"title": "", "postText": "World", "userName": "alice"});
        let request = CreatePostRequest::from_payload(&payload).unwrap();
        match request.into_new_post().unwrap_err() {
            AppError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("title")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_create_comment_request_optional_post() {
        let request =
            CreateCommentRequest::from_payload(&json!({"commentBody": "nice post"})).unwrap();
        let comment = request.into_new_comment().unwrap();
        assert_eq!(comment.post_id, None);

        let request =
            CreateCommentRequest::from_payload(&json!({"commentBody": "nice post", "PostID": 1}))
                .unwrap();
        assert_eq!(request.post_id, Some(PostId::new(1)));
    }

    #[test]
    fn test_non_object_payload_is_bad_request() {
        assert!(matches!(
            CreateCommentRequest::from_payload(&json!(["commentBody"])),
            Err(AppError::BadRequest(_))
        ));
    }
}
