//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL,
//! following the repository pattern: each entity has a repository in
//! [`handlers`] that encapsulates its queries and returns record structs from
//! [`models`]. Role constraints that the original schema expressed through
//! implicit foreign-key filters (a subject's teacher must be a TEACHER, a
//! mark's student must be a STUDENT) are enforced here, at the data-access
//! boundary.
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/`
//! directory; [`crate::migrator`] provides access to the migrator.

pub mod errors;
pub mod handlers;
pub mod models;
