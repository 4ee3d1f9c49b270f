//! Database repository for marks.
//!
//! The (student, subject) pair is unique; a second insert for the same pair
//! surfaces as [`DbError::UniqueViolation`], which the API layer turns into a
//! validation error. The constraint is what guarantees exactly one surviving
//! row under concurrent create attempts.

use crate::types::{abbrev_uuid, MarkId, UserId};
use crate::{
    api::models::users::Role,
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::marks::{MarkCreateDBRequest, MarkDBResponse, MarkUpdateDBRequest, StudentSubjectScore},
    },
};
use chrono::{DateTime, Utc};
use sqlx::{Connection, FromRow, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing marks. Admins and teachers both see the full table.
#[derive(Debug, Clone, Default)]
pub struct MarkFilter {}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Mark {
    pub id: MarkId,
    pub student_id: UserId,
    pub subject_id: Uuid,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Mark> for MarkDBResponse {
    fn from(mark: Mark) -> Self {
        Self {
            id: mark.id,
            student_id: mark.student_id,
            subject_id: mark.subject_id,
            score: mark.score,
            created_at: mark.created_at,
            updated_at: mark.updated_at,
        }
    }
}

pub struct Marks<'c> {
    db: &'c mut PgConnection,
}

/// A mark's owner must carry the STUDENT role. Checked here, inside the same
/// transaction as the insert that references the user.
async fn ensure_student(db: &mut PgConnection, user_id: UserId) -> Result<()> {
    let role = sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&mut *db)
        .await?;

    match role {
        // A missing user falls through to the foreign key constraint.
        Some(Role::Student) | None => Ok(()),
        Some(_) => Err(DbError::RoleMismatch {
            expected: "STUDENT",
            user_id: user_id.to_string(),
        }),
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Marks<'c> {
    type CreateRequest = MarkCreateDBRequest;
    type UpdateRequest = MarkUpdateDBRequest;
    type Response = MarkDBResponse;
    type Id = MarkId;
    type Filter = MarkFilter;

    #[instrument(skip(self, request), fields(student_id = %abbrev_uuid(&request.student_id), subject_id = %abbrev_uuid(&request.subject_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mark_id = Uuid::new_v4();

        let mut tx = self.db.begin().await?;
        ensure_student(&mut tx, request.student_id).await?;

        let mark = sqlx::query_as::<_, Mark>(
            r#"
            INSERT INTO marks (id, student_id, subject_id, score)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(mark_id)
        .bind(request.student_id)
        .bind(request.subject_id)
        .bind(request.score)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(MarkDBResponse::from(mark))
    }

    #[instrument(skip(self), fields(mark_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let mark = sqlx::query_as::<_, Mark>("SELECT * FROM marks WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(mark.map(MarkDBResponse::from))
    }

    #[instrument(skip(self, _filter), err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let marks = sqlx::query_as::<_, Mark>("SELECT * FROM marks ORDER BY created_at")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(marks.into_iter().map(MarkDBResponse::from).collect())
    }

    #[instrument(skip(self), fields(mark_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM marks WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(mark_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mark = sqlx::query_as::<_, Mark>(
            r#"
            UPDATE marks SET
                score = COALESCE($2, score),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.score)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(MarkDBResponse::from(mark))
    }
}

impl<'c> Marks<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// All of one student's marks with their subject names, for report
    /// rendering. Ordered by subject name.
    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn list_for_student(&mut self, student_id: UserId) -> Result<Vec<StudentSubjectScore>> {
        let rows = sqlx::query_as::<_, StudentSubjectScore>(
            r#"
            SELECT s.name AS subject_name, m.score
            FROM marks m
            INNER JOIN subjects s ON m.subject_id = s.id
            WHERE m.student_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(student_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::super::repository::Repository;
    use super::*;
    use crate::api::models::users::Role;
    use crate::test_utils::{create_test_subject, create_test_user};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_mark(pool: PgPool) {
        let (teacher, _) = create_test_user(&pool, Role::Teacher).await;
        let (student, _) = create_test_user(&pool, Role::Student).await;
        let subject = create_test_subject(&pool, "Maths", teacher.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Marks::new(&mut conn);

        let mark = repo
            .create(&MarkCreateDBRequest {
                student_id: student.id,
                subject_id: subject.id,
                score: 87.5,
            })
            .await
            .unwrap();

        assert_eq!(mark.student_id, student.id);
        assert_eq!(mark.subject_id, subject.id);
        assert_eq!(mark.score, 87.5);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_second_mark_for_same_pair_fails_and_one_row_persists(pool: PgPool) {
        let (teacher, _) = create_test_user(&pool, Role::Teacher).await;
        let (student, _) = create_test_user(&pool, Role::Student).await;
        let subject = create_test_subject(&pool, "Maths", teacher.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Marks::new(&mut conn);

        let request = MarkCreateDBRequest {
            student_id: student.id,
            subject_id: subject.id,
            score: 60.0,
        };
        repo.create(&request).await.unwrap();
        let err = repo.create(&request).await.unwrap_err();

        match err {
            DbError::UniqueViolation { constraint, .. } => {
                assert_eq!(constraint.as_deref(), Some("marks_student_subject_key"));
            }
            other => panic!("expected unique violation, got {other:?}"),
        }

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM marks WHERE student_id = $1 AND subject_id = $2")
            .bind(student.id)
            .bind(subject.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_mark_rejects_non_student(pool: PgPool) {
        let (teacher, _) = create_test_user(&pool, Role::Teacher).await;
        let (other_teacher, _) = create_test_user(&pool, Role::Teacher).await;
        let subject = create_test_subject(&pool, "Maths", teacher.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Marks::new(&mut conn);

        let err = repo
            .create(&MarkCreateDBRequest {
                student_id: other_teacher.id,
                subject_id: subject.id,
                score: 50.0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::RoleMismatch { expected: "STUDENT", .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_for_student_orders_by_subject_name(pool: PgPool) {
        let (teacher, _) = create_test_user(&pool, Role::Teacher).await;
        let (student, _) = create_test_user(&pool, Role::Student).await;
        let physics = create_test_subject(&pool, "Physics", teacher.id).await;
        let algebra = create_test_subject(&pool, "Algebra", teacher.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Marks::new(&mut conn);

        for (subject_id, score) in [(physics.id, 91.0), (algebra.id, 72.0)] {
            repo.create(&MarkCreateDBRequest {
                student_id: student.id,
                subject_id,
                score,
            })
            .await
            .unwrap();
        }

        let rows = repo.list_for_student(student.id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].subject_name, "Algebra");
        assert_eq!(rows[0].score, 72.0);
        assert_eq!(rows[1].subject_name, "Physics");
        assert_eq!(rows[1].score, 91.0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_deleting_subject_cascades_to_marks(pool: PgPool) {
        let (teacher, _) = create_test_user(&pool, Role::Teacher).await;
        let (student, _) = create_test_user(&pool, Role::Student).await;
        let subject = create_test_subject(&pool, "Doomed", teacher.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Marks::new(&mut conn);
        let mark = repo
            .create(&MarkCreateDBRequest {
                student_id: student.id,
                subject_id: subject.id,
                score: 55.0,
            })
            .await
            .unwrap();

        sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(subject.id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(repo.get_by_id(mark.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_score(pool: PgPool) {
        let (teacher, _) = create_test_user(&pool, Role::Teacher).await;
        let (student, _) = create_test_user(&pool, Role::Student).await;
        let subject = create_test_subject(&pool, "Maths", teacher.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Marks::new(&mut conn);

        let mark = repo
            .create(&MarkCreateDBRequest {
                student_id: student.id,
                subject_id: subject.id,
                score: 40.0,
            })
            .await
            .unwrap();

        let updated = repo.update(mark.id, &MarkUpdateDBRequest { score: Some(65.0) }).await.unwrap();
        assert_eq!(updated.score, 65.0);
        assert_eq!(updated.id, mark.id);
    }
}
