use crate::{
    api::models::{
        marks::{MarkCreate, MarkResponse, MarkUpdate},
        users::CurrentUser,
    },
    auth::permissions::{is_admin, is_teacher, require_any},
    db::{
        errors::DbError,
        handlers::{marks::MarkFilter, Marks, Repository, Subjects},
        models::marks::{MarkCreateDBRequest, MarkUpdateDBRequest},
    },
    errors::Error,
    types::{MarkId, SubjectId},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::PgConnection;

/// A teacher may only write marks for subjects they own; admins bypass the
/// ownership check. The subject must exist either way.
async fn ensure_can_write(conn: &mut PgConnection, current_user: &CurrentUser, subject_id: SubjectId) -> Result<(), Error> {
    let mut subjects = Subjects::new(conn);
    let subject = subjects.get_by_id(subject_id).await?.ok_or_else(|| Error::NotFound {
        resource: "Subject".to_string(),
        id: subject_id.to_string(),
    })?;

    if is_teacher(current_user) && subject.teacher_id != current_user.id {
        return Err(Error::Forbidden {
            action: "record marks for",
            resource: "a subject you are not assigned to".to_string(),
        });
    }

    Ok(())
}

// GET /marks/ - List marks (admin or teacher)
#[utoipa::path(
    get,
    path = "/marks/",
    tag = "marks",
    responses(
        (status = 200, description = "All marks with derived grades", body = [MarkResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_token" = []))
)]
pub async fn list_marks(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<MarkResponse>>, Error> {
    require_any(&current_user, &[is_admin, is_teacher], "list", "marks")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Marks::new(&mut conn);

    let marks = repo.list(&MarkFilter::default()).await?;
    Ok(Json(marks.into_iter().map(MarkResponse::from).collect()))
}

// GET /marks/{id}/ - Get a mark (admin or teacher)
#[utoipa::path(
    get,
    path = "/marks/{id}/",
    tag = "marks",
    params(("id" = uuid::Uuid, Path, description = "Mark ID")),
    responses(
        (status = 200, description = "Mark with derived grade", body = MarkResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Mark not found"),
    ),
    security(("bearer_token" = []))
)]
pub async fn get_mark(State(state): State<AppState>, Path(mark_id): Path<MarkId>, current_user: CurrentUser) -> Result<Json<MarkResponse>, Error> {
    require_any(&current_user, &[is_admin, is_teacher], "read", "marks")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Marks::new(&mut conn);

    let mark = repo.get_by_id(mark_id).await?.ok_or_else(|| Error::NotFound {
        resource: "Mark".to_string(),
        id: mark_id.to_string(),
    })?;

    Ok(Json(MarkResponse::from(mark)))
}

// POST /marks/ - Create mark (teacher for own subjects; admin for any)
#[utoipa::path(
    post,
    path = "/marks/",
    tag = "marks",
    request_body = MarkCreate,
    responses(
        (status = 201, description = "Mark created successfully", body = MarkResponse),
        (status = 400, description = "Duplicate (student, subject) pair or invalid data"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not assigned to this subject"),
        (status = 404, description = "Subject not found"),
    ),
    security(("bearer_token" = []))
)]
pub async fn create_mark(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(mark_data): Json<MarkCreate>,
) -> Result<(StatusCode, Json<MarkResponse>), Error> {
    require_any(&current_user, &[is_admin, is_teacher], "create", "marks")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    ensure_can_write(&mut conn, &current_user, mark_data.subject_id).await?;

    let mut repo = Marks::new(&mut conn);
    let mark = repo.create(&MarkCreateDBRequest::from(mark_data)).await?;
    Ok((StatusCode::CREATED, Json(MarkResponse::from(mark))))
}

// PUT/PATCH /marks/{id}/ - Update a mark's score (teacher for own subjects; admin for any)
#[utoipa::path(
    put,
    path = "/marks/{id}/",
    tag = "marks",
    params(("id" = uuid::Uuid, Path, description = "Mark ID to update")),
    request_body = MarkUpdate,
    responses(
        (status = 200, description = "Mark updated successfully", body = MarkResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not assigned to this subject"),
        (status = 404, description = "Mark not found"),
    ),
    security(("bearer_token" = []))
)]
pub async fn update_mark(
    State(state): State<AppState>,
    Path(mark_id): Path<MarkId>,
    current_user: CurrentUser,
    Json(mark_data): Json<MarkUpdate>,
) -> Result<Json<MarkResponse>, Error> {
    require_any(&current_user, &[is_admin, is_teacher], "update", "marks")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;

    let existing = {
        let mut repo = Marks::new(&mut conn);
        repo.get_by_id(mark_id).await?.ok_or_else(|| Error::NotFound {
            resource: "Mark".to_string(),
            id: mark_id.to_string(),
        })?
    };
    ensure_can_write(&mut conn, &current_user, existing.subject_id).await?;

    let mut repo = Marks::new(&mut conn);
    let mark = repo.update(mark_id, &MarkUpdateDBRequest::from(mark_data)).await?;
    Ok(Json(MarkResponse::from(mark)))
}

// DELETE /marks/{id}/ - Delete a mark (teacher for own subjects; admin for any)
#[utoipa::path(
    delete,
    path = "/marks/{id}/",
    tag = "marks",
    params(("id" = uuid::Uuid, Path, description = "Mark ID to delete")),
    responses(
        (status = 204, description = "Mark deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not assigned to this subject"),
        (status = 404, description = "Mark not found"),
    ),
    security(("bearer_token" = []))
)]
pub async fn delete_mark(State(state): State<AppState>, Path(mark_id): Path<MarkId>, current_user: CurrentUser) -> Result<StatusCode, Error> {
    require_any(&current_user, &[is_admin, is_teacher], "delete", "marks")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;

    let existing = {
        let mut repo = Marks::new(&mut conn);
        repo.get_by_id(mark_id).await?.ok_or_else(|| Error::NotFound {
            resource: "Mark".to_string(),
            id: mark_id.to_string(),
        })?
    };
    ensure_can_write(&mut conn, &current_user, existing.subject_id).await?;

    let mut repo = Marks::new(&mut conn);
    repo.delete(mark_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
