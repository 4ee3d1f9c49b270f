use crate::{
    api::models::users::CurrentUser,
    db::{errors::DbError, handlers::Tokens},
    errors::{Error, Result},
    AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, trace};

/// Extract the bearer token secret from the Authorization header.
/// Returns None when the header is missing or not a Bearer token.
fn bearer_secret(parts: &Parts) -> Result<Option<&str>> {
    let auth_header = match parts.headers.get(axum::http::header::AUTHORIZATION) {
        Some(header) => header,
        None => return Ok(None),
    };

    let auth_str = auth_header.to_str().map_err(|e| Error::BadRequest {
        message: format!("Invalid authorization header: {e}"),
    })?;

    Ok(auth_str.strip_prefix("Bearer "))
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let secret = match bearer_secret(parts)? {
            Some(secret) => secret,
            None => {
                trace!("No authentication credentials found in request");
                return Err(Error::Unauthenticated { message: None });
            }
        };

        let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
        let mut tokens = Tokens::new(&mut conn);

        match tokens.find_user_by_secret(secret).await? {
            Some(user) => {
                debug!("Authenticated user {} via bearer token", user.username);
                Ok(user)
            }
            None => Err(Error::Unauthenticated {
                message: Some("Invalid token".to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::test_utils::{create_test_app_state, create_test_user};
    use axum::extract::FromRequestParts as _;
    use sqlx::PgPool;

    fn parts_with_header(header_value: Option<&str>) -> Parts {
        let mut builder = axum::http::Request::builder().uri("http://localhost/test");
        if let Some(value) = header_value {
            builder = builder.header("authorization", value);
        }
        let (parts, _body) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_valid_token_resolves_user(pool: PgPool) {
        let state = create_test_app_state(pool.clone());
        let (user, token) = create_test_user(&pool, Role::Teacher).await;

        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let current = CurrentUser::from_request_parts(&mut parts, &state).await.unwrap();

        assert_eq!(current.id, user.id);
        assert_eq!(current.username, user.username);
        assert_eq!(current.role, Role::Teacher);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_unknown_token_is_unauthorized(pool: PgPool) {
        let state = create_test_app_state(pool.clone());

        let mut parts = parts_with_header(Some("Bearer gb-definitely-not-issued"));
        let err = CurrentUser::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_missing_header_is_unauthorized(pool: PgPool) {
        let state = create_test_app_state(pool.clone());

        let mut parts = parts_with_header(None);
        let err = CurrentUser::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_non_bearer_scheme_is_unauthorized(pool: PgPool) {
        let state = create_test_app_state(pool.clone());

        let mut parts = parts_with_header(Some("Basic dXNlcjpwYXNz"));
        let err = CurrentUser::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
