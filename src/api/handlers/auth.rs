use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::{
    api::models::auth::{LoginRequest, LoginResponse, LoginUser},
    auth::password,
    db::{errors::DbError, handlers::{Tokens, Users}},
    errors::Error,
    AppState,
};

/// Login with username and password.
///
/// The two failure modes stay distinguishable on purpose: an unknown
/// username is a 404 and a wrong password a 401, and both are logged at
/// warning level with the reason.
#[utoipa::path(
    post,
    path = "/login/",
    tag = "authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 404, description = "Username not found"),
        (status = 401, description = "Incorrect password"),
    )
)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;

    let user = {
        let mut user_repo = Users::new(&mut conn);
        match user_repo.get_by_username(&request.username).await? {
            Some(user) => user,
            None => {
                warn!("Failed login attempt: user '{}' not found", request.username);
                return Err(Error::UnknownUser {
                    username: request.username,
                });
            }
        }
    };

    // Verify password on a blocking thread to avoid blocking the async runtime
    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        warn!("Failed login attempt for user '{}': incorrect password", user.username);
        return Err(Error::Unauthenticated {
            message: Some("Incorrect password.".to_string()),
        });
    }

    // Issue the durable token on first login, reuse it afterwards
    let mut tokens = Tokens::new(&mut conn);
    let token = tokens.get_or_create(user.id).await?;

    info!("User '{}' logged in successfully", user.username);

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: user.id,
            username: user.username,
            role: user.role,
        },
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::models::auth::LoginResponse;
    use crate::api::models::users::Role;
    use crate::test_utils::*;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_unknown_username_is_404(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app
            .post("/login/")
            .json(&json!({"username": "nobody", "password": "whatever"}))
            .await;

        response.assert_status_not_found();
        assert_eq!(response.text(), "Username not found.");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_wrong_password_is_401(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let (user, _) = create_test_user(&pool, Role::Student).await;

        let response = app
            .post("/login/")
            .json(&json!({"username": user.username, "password": "wrong-password"}))
            .await;

        response.assert_status_unauthorized();
        assert_eq!(response.text(), "Incorrect password.");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_success_returns_identity_and_token(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let (user, _) = create_test_user(&pool, Role::Teacher).await;

        let response = app
            .post("/login/")
            .json(&json!({"username": user.username, "password": TEST_PASSWORD}))
            .await;

        response.assert_status_ok();
        let body: LoginResponse = response.json();
        assert!(body.token.starts_with("gb-"));
        assert_eq!(body.user.id, user.id);
        assert_eq!(body.user.username, user.username);
        assert_eq!(body.user.role, Role::Teacher);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_token_is_stable_across_logins(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let (user, _) = create_test_user(&pool, Role::Student).await;

        let first: LoginResponse = app
            .post("/login/")
            .json(&json!({"username": user.username, "password": TEST_PASSWORD}))
            .await
            .json();
        let second: LoginResponse = app
            .post("/login/")
            .json(&json!({"username": user.username, "password": TEST_PASSWORD}))
            .await
            .json();

        assert_eq!(first.token, second.token);
    }
}
