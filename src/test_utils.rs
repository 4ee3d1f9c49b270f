//! Shared helpers for integration tests.

use crate::{
    api::models::users::Role,
    auth::password,
    build_router,
    db::{
        handlers::{Marks, Repository, Subjects, Tokens, Users},
        models::{
            marks::{MarkCreateDBRequest, MarkDBResponse},
            subjects::{SubjectCreateDBRequest, SubjectDBResponse},
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
    types::{SubjectId, UserId},
    AppState, Config,
};
use axum_test::TestServer;
use sqlx::PgPool;
use uuid::Uuid;

/// The password every test user is created with.
pub const TEST_PASSWORD: &str = "test-password-1234";

pub fn create_test_config() -> Config {
    Config::default()
}

pub fn create_test_app_state(pool: PgPool) -> AppState {
    AppState {
        db: pool,
        config: create_test_config(),
    }
}

/// Build a test server over the full router.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let router = build_router(create_test_app_state(pool));
    TestServer::new(router).expect("Failed to create test server")
}

/// Create a user with the given role and return it with its bearer token.
pub async fn create_test_user(pool: &PgPool, role: Role) -> (UserDBResponse, String) {
    let mut conn = pool.acquire().await.expect("Failed to acquire database connection");

    let suffix = Uuid::new_v4().simple().to_string();
    let user = {
        let mut users = Users::new(&mut conn);
        users
            .create(&UserCreateDBRequest {
                username: format!("user-{}", &suffix[..12]),
                password_hash: password::hash_string(TEST_PASSWORD).unwrap(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: format!("user-{}@example.com", &suffix[..12]),
                role,
            })
            .await
            .expect("Failed to create test user")
    };

    let mut tokens = Tokens::new(&mut conn);
    let token = tokens.get_or_create(user.id).await.expect("Failed to issue test token");

    (user, token)
}

pub async fn create_test_subject(pool: &PgPool, name: &str, teacher_id: UserId) -> SubjectDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire database connection");
    let mut subjects = Subjects::new(&mut conn);

    subjects
        .create(&SubjectCreateDBRequest {
            name: name.to_string(),
            teacher_id,
        })
        .await
        .expect("Failed to create test subject")
}

pub async fn create_test_mark(pool: &PgPool, student_id: UserId, subject_id: SubjectId, score: f64) -> MarkDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire database connection");
    let mut marks = Marks::new(&mut conn);

    marks
        .create(&MarkCreateDBRequest {
            student_id,
            subject_id,
            score,
        })
        .await
        .expect("Failed to create test mark")
}
