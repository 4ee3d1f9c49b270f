use crate::{
    api::models::users::{CurrentUser, ListUsersQuery, UserCreate, UserResponse, UserUpdate},
    auth::{
        password,
        permissions::{is_admin, is_teacher, require_admin, require_any},
    },
    db::{
        errors::DbError,
        handlers::{users::UserFilter, Repository, Users},
        models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    },
    errors::Error,
    types::UserId,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

// GET /users/ - List users (admin or teacher)
#[utoipa::path(
    get,
    path = "/users/",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "List of users ordered by username", body = [UserResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_token" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
    current_user: CurrentUser,
) -> Result<Json<Vec<UserResponse>>, Error> {
    require_any(&current_user, &[is_admin, is_teacher], "list", "users")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Users::new(&mut conn);

    let users = repo.list(&UserFilter::new(query.role)).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// GET /users/{id}/ - Get a specific user (admin or teacher)
#[utoipa::path(
    get,
    path = "/users/{id}/",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_token" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    current_user: CurrentUser,
) -> Result<Json<UserResponse>, Error> {
    require_any(&current_user, &[is_admin, is_teacher], "read", "users")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Users::new(&mut conn);

    let user = repo.get_by_id(user_id).await?.ok_or_else(|| Error::NotFound {
        resource: "User".to_string(),
        id: user_id.to_string(),
    })?;

    Ok(Json(UserResponse::from(user)))
}

// POST /users/ - Create user (admin only)
#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Invalid user data or username taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin access required"),
    ),
    security(("bearer_token" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(user_data): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), Error> {
    require_admin(&current_user, "create", "users")?;

    // Hash the password on a blocking thread to avoid blocking the async runtime
    let password = user_data.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string(&password))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Users::new(&mut conn);

    let user = repo.create(&UserCreateDBRequest::new(user_data, password_hash)).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// PUT/PATCH /users/{id}/ - Update user (admin only)
#[utoipa::path(
    put,
    path = "/users/{id}/",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User ID to update")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin access required"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_token" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    current_user: CurrentUser,
    Json(user_data): Json<UserUpdate>,
) -> Result<Json<UserResponse>, Error> {
    require_admin(&current_user, "update", "users")?;

    let password_hash = match user_data.password.clone() {
        Some(password) => Some(
            tokio::task::spawn_blocking(move || password::hash_string(&password))
                .await
                .map_err(|e| Error::Internal {
                    operation: format!("spawn password hashing task: {e}"),
                })??,
        ),
        None => None,
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Users::new(&mut conn);

    let user = repo.update(user_id, &UserUpdateDBRequest::new(user_data, password_hash)).await?;
    Ok(Json(UserResponse::from(user)))
}

// DELETE /users/{id}/ - Delete user (admin only)
#[utoipa::path(
    delete,
    path = "/users/{id}/",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User ID to delete")),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin access required"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_token" = []))
)]
pub async fn delete_user(State(state): State<AppState>, Path(user_id): Path<UserId>, current_user: CurrentUser) -> Result<StatusCode, Error> {
    require_admin(&current_user, "delete", "users")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Users::new(&mut conn);

    match repo.delete(user_id).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(Error::NotFound {
            resource: "User".to_string(),
            id: user_id.to_string(),
        }),
    }
}
