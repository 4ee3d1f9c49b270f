//! Aggregate average queries for subjects and students.

use crate::{api::models::users::Role, db::errors::Result, types::UserId};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

/// Per-subject average over its marks. `average_score` is absent (not zero)
/// for subjects with no marks.
#[derive(Debug, Clone, FromRow)]
pub struct SubjectAverageRow {
    pub name: String,
    pub average_score: Option<f64>,
}

/// Per-student average over their marks. Students without marks never appear
/// in the result set (inner join).
#[derive(Debug, Clone, FromRow)]
pub struct StudentAverageRow {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub average_score: Option<f64>,
}

/// Average score per subject, over every subject, ordered by subject name.
#[instrument(skip(db), err)]
pub async fn class_averages(db: &PgPool) -> Result<Vec<SubjectAverageRow>> {
    let rows = sqlx::query_as::<_, SubjectAverageRow>(
        r#"
        SELECT s.name, AVG(m.score) AS average_score
        FROM subjects s
        LEFT JOIN marks m ON m.subject_id = s.id
        GROUP BY s.id, s.name
        ORDER BY s.name
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Average score per student, over students that have at least one mark,
/// ordered by username.
#[instrument(skip(db), err)]
pub async fn student_averages(db: &PgPool) -> Result<Vec<StudentAverageRow>> {
    let rows = sqlx::query_as::<_, StudentAverageRow>(
        r#"
        SELECT u.id, u.username, u.first_name, u.last_name, AVG(m.score) AS average_score
        FROM users u
        INNER JOIN marks m ON m.student_id = u.id
        WHERE u.role = $1
        GROUP BY u.id, u.username, u.first_name, u.last_name
        ORDER BY u.username
        "#,
    )
    .bind(Role::Student)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
