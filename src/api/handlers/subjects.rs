use crate::{
    api::models::{
        subjects::{SubjectCreate, SubjectResponse, SubjectUpdate},
        users::CurrentUser,
    },
    auth::permissions::{is_admin, is_teacher, require_admin, require_any},
    db::{
        errors::DbError,
        handlers::{subjects::SubjectFilter, Repository, Subjects},
        models::subjects::{SubjectCreateDBRequest, SubjectUpdateDBRequest},
    },
    errors::Error,
    types::SubjectId,
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

// GET /subjects/ - List subjects, scoped by role (admin: all, teacher: own)
#[utoipa::path(
    get,
    path = "/subjects/",
    tag = "subjects",
    responses(
        (status = 200, description = "Subjects visible to the requester, ordered by name", body = [SubjectResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_token" = []))
)]
pub async fn list_subjects(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<SubjectResponse>>, Error> {
    require_any(&current_user, &[is_admin, is_teacher], "list", "subjects")?;

    // Admins see the whole catalogue, teachers only what they own.
    let filter = if is_admin(&current_user) {
        SubjectFilter::default()
    } else {
        SubjectFilter::owned_by(current_user.id)
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Subjects::new(&mut conn);

    let subjects = repo.list(&filter).await?;
    Ok(Json(subjects.into_iter().map(SubjectResponse::from).collect()))
}

// GET /subjects/{id}/ - Get a subject (admin: any, teacher: own only)
#[utoipa::path(
    get,
    path = "/subjects/{id}/",
    tag = "subjects",
    params(("id" = uuid::Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject information", body = SubjectResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Subject not found"),
    ),
    security(("bearer_token" = []))
)]
pub async fn get_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<SubjectId>,
    current_user: CurrentUser,
) -> Result<Json<SubjectResponse>, Error> {
    require_any(&current_user, &[is_admin, is_teacher], "read", "subjects")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Subjects::new(&mut conn);

    let not_found = || Error::NotFound {
        resource: "Subject".to_string(),
        id: subject_id.to_string(),
    };

    let subject = repo.get_by_id(subject_id).await?.ok_or_else(not_found)?;

    // A subject outside a teacher's scope reads as absent, not forbidden.
    if !is_admin(&current_user) && subject.teacher_id != current_user.id {
        return Err(not_found());
    }

    Ok(Json(SubjectResponse::from(subject)))
}

// POST /subjects/ - Create subject (admin only)
#[utoipa::path(
    post,
    path = "/subjects/",
    tag = "subjects",
    request_body = SubjectCreate,
    responses(
        (status = 201, description = "Subject created successfully", body = SubjectResponse),
        (status = 400, description = "Invalid data, duplicate name, or owner is not a teacher"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin access required"),
    ),
    security(("bearer_token" = []))
)]
pub async fn create_subject(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(subject_data): Json<SubjectCreate>,
) -> Result<(StatusCode, Json<SubjectResponse>), Error> {
    require_admin(&current_user, "create", "subjects")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Subjects::new(&mut conn);

    let subject = repo.create(&SubjectCreateDBRequest::from(subject_data)).await?;
    Ok((StatusCode::CREATED, Json(SubjectResponse::from(subject))))
}

// PUT/PATCH /subjects/{id}/ - Update subject (admin only)
#[utoipa::path(
    put,
    path = "/subjects/{id}/",
    tag = "subjects",
    params(("id" = uuid::Uuid, Path, description = "Subject ID to update")),
    request_body = SubjectUpdate,
    responses(
        (status = 200, description = "Subject updated successfully", body = SubjectResponse),
        (status = 400, description = "Invalid data or new owner is not a teacher"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin access required"),
        (status = 404, description = "Subject not found"),
    ),
    security(("bearer_token" = []))
)]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<SubjectId>,
    current_user: CurrentUser,
    Json(subject_data): Json<SubjectUpdate>,
) -> Result<Json<SubjectResponse>, Error> {
    require_admin(&current_user, "update", "subjects")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Subjects::new(&mut conn);

    let subject = repo.update(subject_id, &SubjectUpdateDBRequest::from(subject_data)).await?;
    Ok(Json(SubjectResponse::from(subject)))
}

// DELETE /subjects/{id}/ - Delete subject (admin only)
#[utoipa::path(
    delete,
    path = "/subjects/{id}/",
    tag = "subjects",
    params(("id" = uuid::Uuid, Path, description = "Subject ID to delete")),
    responses(
        (status = 204, description = "Subject deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin access required"),
        (status = 404, description = "Subject not found"),
    ),
    security(("bearer_token" = []))
)]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<SubjectId>,
    current_user: CurrentUser,
) -> Result<StatusCode, Error> {
    require_admin(&current_user, "delete", "subjects")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Subjects::new(&mut conn);

    match repo.delete(subject_id).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(Error::NotFound {
            resource: "Subject".to_string(),
            id: subject_id.to_string(),
        }),
    }
}
