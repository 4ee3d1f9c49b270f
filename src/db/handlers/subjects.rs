//! Database repository for subjects.

use crate::types::{abbrev_uuid, SubjectId, UserId};
use crate::{
    api::models::users::Role,
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::subjects::{SubjectCreateDBRequest, SubjectDBResponse, SubjectUpdateDBRequest},
    },
};
use chrono::{DateTime, Utc};
use sqlx::{Connection, FromRow, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing subjects. `teacher_id` scopes the listing to subjects
/// owned by that teacher; `None` lists everything (admin view).
#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
    pub teacher_id: Option<UserId>,
}

impl SubjectFilter {
    pub fn owned_by(teacher_id: UserId) -> Self {
        Self {
            teacher_id: Some(teacher_id),
        }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub teacher_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Subject> for SubjectDBResponse {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            teacher_id: subject.teacher_id,
            created_at: subject.created_at,
            updated_at: subject.updated_at,
        }
    }
}

pub struct Subjects<'c> {
    db: &'c mut PgConnection,
}

/// A subject's owner must carry the TEACHER role. Checked here, inside the
/// same transaction as the write that references the user.
async fn ensure_teacher(db: &mut PgConnection, user_id: UserId) -> Result<()> {
    let role = sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&mut *db)
        .await?;

    match role {
        // A missing user falls through to the foreign key constraint.
        Some(Role::Teacher) | None => Ok(()),
        Some(_) => Err(DbError::RoleMismatch {
            expected: "TEACHER",
            user_id: user_id.to_string(),
        }),
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Subjects<'c> {
    type CreateRequest = SubjectCreateDBRequest;
    type UpdateRequest = SubjectUpdateDBRequest;
    type Response = SubjectDBResponse;
    type Id = SubjectId;
    type Filter = SubjectFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let subject_id = Uuid::new_v4();

        let mut tx = self.db.begin().await?;
        ensure_teacher(&mut tx, request.teacher_id).await?;

        let subject = sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (id, name, teacher_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(subject_id)
        .bind(&request.name)
        .bind(request.teacher_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SubjectDBResponse::from(subject))
    }

    #[instrument(skip(self), fields(subject_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let subject = sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(subject.map(SubjectDBResponse::from))
    }

    #[instrument(skip(self, filter), fields(teacher_id = ?filter.teacher_id), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let subjects = if let Some(teacher_id) = filter.teacher_id {
            sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE teacher_id = $1 ORDER BY name")
                .bind(teacher_id)
                .fetch_all(&mut *self.db)
                .await?
        } else {
            sqlx::query_as::<_, Subject>("SELECT * FROM subjects ORDER BY name")
                .fetch_all(&mut *self.db)
                .await?
        };

        Ok(subjects.into_iter().map(SubjectDBResponse::from).collect())
    }

    #[instrument(skip(self), fields(subject_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(subject_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        if let Some(teacher_id) = request.teacher_id {
            ensure_teacher(&mut tx, teacher_id).await?;
        }

        let subject = sqlx::query_as::<_, Subject>(
            r#"
            UPDATE subjects SET
                name = COALESCE($2, name),
                teacher_id = COALESCE($3, teacher_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.teacher_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound)?;

        tx.commit().await?;

        Ok(SubjectDBResponse::from(subject))
    }
}

impl<'c> Subjects<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}
