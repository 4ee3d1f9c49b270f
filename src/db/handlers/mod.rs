//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction, provides
//! strongly-typed CRUD operations, and returns record structs from
//! [`crate::db::models`]. Create repositories from a transaction when an
//! operation spans multiple statements:
//!
//! ```ignore
//! use gradebook::db::handlers::{Repository, Users};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Users::new(&mut conn);
//!     if let Some(user) = repo.get_by_username("ada").await? {
//!         println!("Found user: {}", user.username);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Available Repositories
//!
//! - [`Users`]: User accounts and role assignment
//! - [`Tokens`]: Durable bearer tokens (one per user)
//! - [`Subjects`]: Subjects and their owning teachers
//! - [`Marks`]: Marks, one per (student, subject) pair
//! - [`analytics`]: Aggregate average queries for subjects and students

pub mod analytics;
pub mod marks;
pub mod repository;
pub mod subjects;
pub mod tokens;
pub mod users;

pub use marks::Marks;
pub use repository::Repository;
pub use subjects::Subjects;
pub use tokens::Tokens;
pub use users::Users;
