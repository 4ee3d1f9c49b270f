//! # gradebook: a role-based grade management backend
//!
//! `gradebook` is the server side of a small school grade-management system.
//! Administrators manage users and subjects, teachers record marks for
//! students in the subjects they teach, students fetch their own report card
//! (as JSON or as a rendered PDF), and admins and teachers read aggregate
//! analytics.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL (via SQLx) for all persistence.
//!
//! Requests flow through three layers:
//!
//! - The **API layer** ([`api`]) holds the route handlers and the
//!   request/response models. Each handler states its own access policy by
//!   composing the role predicates from [`auth::permissions`] - there is no
//!   process-wide permission registry.
//! - The **authentication layer** ([`auth`]) resolves the per-request bearer
//!   token to a user. Every user holds exactly one durable token, issued on
//!   first login and reused afterwards.
//! - The **database layer** ([`db`]) uses the repository pattern: each
//!   entity has a repository handling its queries. Role constraints on
//!   relations (a subject's teacher, a mark's student) are validated here,
//!   and the (student, subject) uniqueness of marks is enforced by the
//!   storage engine so concurrent creates leave exactly one row.
//!
//! Grade computation ([`grading`]) is pure: a fixed 90/80/70/60 band scale
//! applied to single scores, report percentages and analytics averages
//! alike. PDF rendering ([`report`]) delegates to printpdf.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use gradebook::{config, telemetry, Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = config::Args::parse();
//!     let config = Config::load(&args)?;
//!     telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
mod crypto;
pub mod db;
pub mod errors;
pub mod grading;
mod openapi;
pub mod report;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::{
    auth::password,
    db::handlers::{Repository, Users},
    db::models::users::UserCreateDBRequest,
    openapi::ApiDoc,
};
use api::models::users::Role;
use axum::{
    routing::{get, post},
    Router,
};
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, instrument, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{MarkId, SubjectId, UserId};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the gradebook database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial admin user if it doesn't exist.
///
/// Idempotent: when a user with the configured username already exists the
/// function returns its ID untouched, so restarts never clobber a changed
/// password. Returns the admin's user ID.
#[instrument(skip_all)]
pub async fn create_initial_admin(username: &str, admin_password: &str, db: &PgPool) -> anyhow::Result<UserId> {
    let mut conn = db.acquire().await?;
    let mut user_repo = Users::new(&mut conn);

    if let Some(existing) = user_repo.get_by_username(username).await? {
        info!("Admin user '{}' already exists, skipping bootstrap", username);
        return Ok(existing.id);
    }

    let password_hash = password::hash_string(admin_password).map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?;

    let created = user_repo
        .create(&UserCreateDBRequest {
            username: username.to_string(),
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            role: Role::Admin,
        })
        .await?;

    info!("Created initial admin user '{}'", username);
    Ok(created.id)
}

/// Build the application router with all endpoints and middleware.
///
/// Routes follow the original surface: router-style CRUD for users, subjects
/// and marks, the student report pair, the two analytics listings, plus
/// `/healthz` and the rendered API docs at `/docs`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/login/", post(api::handlers::auth::login))
        // User management (admin writes, admin/teacher reads)
        .route("/users/", get(api::handlers::users::list_users).post(api::handlers::users::create_user))
        .route(
            "/users/{id}/",
            get(api::handlers::users::get_user)
                .put(api::handlers::users::update_user)
                .patch(api::handlers::users::update_user)
                .delete(api::handlers::users::delete_user),
        )
        // Subject management (admin writes, reads scoped per role)
        .route(
            "/subjects/",
            get(api::handlers::subjects::list_subjects).post(api::handlers::subjects::create_subject),
        )
        .route(
            "/subjects/{id}/",
            get(api::handlers::subjects::get_subject)
                .put(api::handlers::subjects::update_subject)
                .patch(api::handlers::subjects::update_subject)
                .delete(api::handlers::subjects::delete_subject),
        )
        // Marks (teacher writes for own subjects, admin bypasses)
        .route("/marks/", get(api::handlers::marks::list_marks).post(api::handlers::marks::create_mark))
        .route(
            "/marks/{id}/",
            get(api::handlers::marks::get_mark)
                .put(api::handlers::marks::update_mark)
                .patch(api::handlers::marks::update_mark)
                .delete(api::handlers::marks::delete_mark),
        )
        // Student report card (always "self")
        .route("/student/report/", get(api::handlers::reports::student_report))
        .route("/student/report/download/", get(api::handlers::reports::download_student_report))
        // Aggregates
        .route("/analytics/class/", get(api::handlers::analytics::class_analytics))
        .route("/analytics/students/", get(api::handlers::analytics::student_analytics))
        .with_state(state);

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations and bootstraps the admin user
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = PgPool::connect(&config.database_url).await?;
        migrator().run(&pool).await?;

        // Bootstrap the admin account when a password is configured
        if let Some(admin_password) = config.admin.password.as_deref() {
            create_initial_admin(&config.admin.username, admin_password, &pool).await?;
        }

        let state = AppState {
            db: pool.clone(),
            config: config.clone(),
        };
        let router = build_router(state);

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("gradebook listening on http://{}", bind_addr);

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_app;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_healthz(pool: PgPool) {
        let app = create_test_app(pool).await;
        let response = app.get("/healthz").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_initial_admin_is_idempotent(pool: PgPool) {
        let first = create_initial_admin("admin", "bootstrap-secret", &pool).await.unwrap();
        let second = create_initial_admin("admin", "different-password", &pool).await.unwrap();
        assert_eq!(first, second);

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = 'admin'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_bootstrapped_admin_can_login(pool: PgPool) {
        create_initial_admin("admin", "bootstrap-secret", &pool).await.unwrap();
        let app = create_test_app(pool).await;

        let response = app
            .post("/login/")
            .json(&serde_json::json!({"username": "admin", "password": "bootstrap-secret"}))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["user"]["role"], "ADMIN");
    }
}
