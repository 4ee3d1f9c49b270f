//! Database models for subjects.

use crate::api::models::subjects::{SubjectCreate, SubjectUpdate};
use crate::types::{SubjectId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a new subject
#[derive(Debug, Clone)]
pub struct SubjectCreateDBRequest {
    pub name: String,
    pub teacher_id: UserId,
}

impl From<SubjectCreate> for SubjectCreateDBRequest {
    fn from(api: SubjectCreate) -> Self {
        Self {
            name: api.name,
            teacher_id: api.teacher_id,
        }
    }
}

/// Database request for updating a subject
#[derive(Debug, Clone)]
pub struct SubjectUpdateDBRequest {
    pub name: Option<String>,
    pub teacher_id: Option<UserId>,
}

impl From<SubjectUpdate> for SubjectUpdateDBRequest {
    fn from(api: SubjectUpdate) -> Self {
        Self {
            name: api.name,
            teacher_id: api.teacher_id,
        }
    }
}

/// Database response for a subject
#[derive(Debug, Clone)]
pub struct SubjectDBResponse {
    pub id: SubjectId,
    pub name: String,
    pub teacher_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
