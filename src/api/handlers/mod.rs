//! HTTP request handlers for all API endpoints.
//!
//! Each handler deserializes the request, checks the requester's role via
//! [`crate::auth::permissions`], executes queries through the repositories in
//! [`crate::db::handlers`], and serializes the response. Errors are
//! [`crate::errors::Error`], which converts to the right HTTP status.
//!
//! - [`auth`]: Login and token issuance
//! - [`users`]: User CRUD (admin writes, admin/teacher reads)
//! - [`subjects`]: Subject CRUD with role-scoped listing
//! - [`marks`]: Mark CRUD with subject-ownership validation
//! - [`reports`]: Student report card, JSON and PDF
//! - [`analytics`]: Class and student aggregates

pub mod analytics;
pub mod auth;
pub mod marks;
pub mod reports;
pub mod subjects;
pub mod users;
