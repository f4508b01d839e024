//! Repository traits for abstracting database operations.
//!
//! The traits define the store operations the HTTP layer needs, allowing the
//! Postgres and in-memory backends to be swapped via dependency injection.

pub mod comments;
pub mod error;
pub mod posts;

pub use comments::CommentRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use posts::PostRepository;

/// Every repository trait the application needs, as a single object type.
///
/// Implemented automatically for any type implementing all the parts.
pub trait FullRepository: PostRepository + CommentRepository {}

impl<T> FullRepository for T where T: PostRepository + CommentRepository {}
