//! Domain models for posts and comments.
//!
//! These types are shared by the repository layer and the HTTP layer. Field
//! names on the wire follow the JSON contract of the public API (`postText`,
//! `userName`, `commentBody`, `PostID`, `createdAt`, `updatedAt`).

pub mod comment;
pub mod macros;
pub mod post;
pub mod registry;

pub use comment::{Comment, CommentId, NewComment};
pub use post::{NewPost, Post, PostId};
pub use registry::{Association, EntityDef, ModelRegistry, RegistryError};

/// A required field failed its constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Field was present but held an empty string.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

impl FieldError {
    /// Name of the offending field, as it appears on the wire.
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Empty { field } => field,
        }
    }
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Empty { field });
    }
    Ok(())
}
