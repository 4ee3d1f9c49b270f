//! Database models for marks.

use crate::api::models::marks::{MarkCreate, MarkUpdate};
use crate::types::{MarkId, SubjectId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a new mark
#[derive(Debug, Clone)]
pub struct MarkCreateDBRequest {
    pub student_id: UserId,
    pub subject_id: SubjectId,
    pub score: f64,
}

impl From<MarkCreate> for MarkCreateDBRequest {
    fn from(api: MarkCreate) -> Self {
        Self {
            student_id: api.student_id,
            subject_id: api.subject_id,
            score: api.score,
        }
    }
}

/// Database request for updating a mark
#[derive(Debug, Clone)]
pub struct MarkUpdateDBRequest {
    pub score: Option<f64>,
}

impl From<MarkUpdate> for MarkUpdateDBRequest {
    fn from(api: MarkUpdate) -> Self {
        Self { score: api.score }
    }
}

/// Database response for a mark
#[derive(Debug, Clone)]
pub struct MarkDBResponse {
    pub id: MarkId,
    pub student_id: UserId,
    pub subject_id: SubjectId,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a student's report: the subject name with the score earned.
#[derive(Debug, Clone, FromRow)]
pub struct StudentSubjectScore {
    pub subject_name: String,
    pub score: f64,
}
