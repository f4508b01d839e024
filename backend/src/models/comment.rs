use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_empty, FieldError, PostId};
use crate::define_id_type;

define_id_type!(i64, CommentId);

/// A persisted comment. `post_id` may be unset when the comment was created
/// without a post reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub comment_body: String,
    #[serde(rename = "PostID")]
    pub post_id: Option<PostId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub comment_body: String,
    #[serde(rename = "PostID", default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
}

impl NewComment {
    pub fn new(comment_body: impl Into<String>, post_id: Option<PostId>) -> Self {
        Self {
            comment_body: comment_body.into(),
            post_id,
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        require_non_empty("commentBody", &self.comment_body)
    }
}
