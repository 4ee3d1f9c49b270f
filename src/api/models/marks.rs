//! API request/response models for marks.

use crate::db::models::marks::MarkDBResponse;
use crate::grading::{grade_of, Grade};
use crate::types::{MarkId, SubjectId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MarkCreate {
    #[schema(value_type = String, format = "uuid")]
    pub student_id: UserId,
    #[schema(value_type = String, format = "uuid")]
    pub subject_id: SubjectId,
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MarkUpdate {
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: MarkId,
    #[schema(value_type = String, format = "uuid")]
    pub student_id: UserId,
    #[schema(value_type = String, format = "uuid")]
    pub subject_id: SubjectId,
    pub score: f64,
    /// Derived from the score on every read; never stored.
    pub grade: Grade,
}

impl From<MarkDBResponse> for MarkResponse {
    fn from(db: MarkDBResponse) -> Self {
        Self {
            id: db.id,
            student_id: db.student_id,
            subject_id: db.subject_id,
            score: db.score,
            grade: grade_of(db.score),
        }
    }
}
