//! API request/response models for subjects.

use crate::db::models::subjects::SubjectDBResponse;
use crate::types::{SubjectId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubjectCreate {
    pub name: String,
    /// The owning teacher; must reference a user with the TEACHER role.
    #[schema(value_type = String, format = "uuid")]
    pub teacher_id: UserId,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubjectUpdate {
    pub name: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub teacher_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubjectResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: SubjectId,
    pub name: String,
    #[schema(value_type = String, format = "uuid")]
    pub teacher_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubjectDBResponse> for SubjectResponse {
    fn from(db: SubjectDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            teacher_id: db.teacher_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
