use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_empty, FieldError};
use crate::define_id_type;

define_id_type!(i64, PostId);

/// A persisted blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub post_text: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a post. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub post_text: String,
    pub user_name: String,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        post_text: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            post_text: post_text.into(),
            user_name: user_name.into(),
        }
    }

    /// Check the non-empty constraints on every text column.
    pub fn validate(&self) -> Result<(), FieldError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("postText", &self.post_text)?;
        require_non_empty("userName", &self.user_name)?;
        Ok(())
    }
}
