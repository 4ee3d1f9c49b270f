//! Authentication and authorization.
//!
//! Authentication is token-based: each user holds exactly one durable bearer
//! token, issued when the user row is first saved and stable thereafter (see
//! [`crate::db::handlers::Tokens`]). Requests present it as
//! `Authorization: Bearer <secret>` and the [`current_user`] extractor
//! resolves it to a [`crate::api::models::users::CurrentUser`].
//!
//! Authorization is role-based: [`permissions`] exposes pure predicates over
//! the authenticated user's role (`is_admin`, `is_teacher`, `is_student`)
//! and `require_*` helpers that handlers compose with logical OR for
//! multi-role endpoints.
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for the authenticated user in handlers
//! - [`password`]: Password hashing and verification using Argon2
//! - [`permissions`]: Role predicates and access checks

pub mod current_user;
pub mod password;
pub mod permissions;
