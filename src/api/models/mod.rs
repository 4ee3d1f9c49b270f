//! API request and response data models.
//!
//! These structures define the public API contract and are distinct from the
//! database models in [`crate::db::models`], so the two representations can
//! evolve independently. All models are annotated with `utoipa` for the
//! generated API docs.

pub mod analytics;
pub mod auth;
pub mod marks;
pub mod reports;
pub mod subjects;
pub mod users;
