//! # Blog Backend
//!
//! JSON API over two related entities, posts and comments, backed by a
//! relational store.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Post and Comment types, field constraints, and the ordered
//!   model registry describing the Post → Comment association
//! - [`db`]: Repository traits, the Postgres (Diesel) and in-memory backends,
//!   configuration profiles and the service layer
//! - [`http`]: Axum router, handlers, request schemas and error responses
//!
//! ## Endpoints
//!
//! | Method | Path                | Response                     |
//! |--------|---------------------|------------------------------|
//! | GET    | `/posts`            | all posts                    |
//! | GET    | `/posts/byID{id}`   | one post or `null`           |
//! | POST   | `/posts`            | the submitted payload        |
//! | GET    | `/comments/{post}`  | comments of a post           |
//! | POST   | `/comments`         | the submitted payload        |
//! | GET    | `/health`           | service and store status     |

pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
