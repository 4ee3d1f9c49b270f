//! API response models for analytics.

use crate::db::handlers::analytics::{StudentAverageRow, SubjectAverageRow};
use crate::grading::grade_of;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-subject class average. `average_score` is `null` for subjects with no
/// marks, never zero.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassAnalyticsEntry {
    pub name: String,
    pub average_score: Option<f64>,
}

impl From<SubjectAverageRow> for ClassAnalyticsEntry {
    fn from(row: SubjectAverageRow) -> Self {
        Self {
            name: row.name,
            average_score: row.average_score,
        }
    }
}

/// Per-student average with the grade band of that average. Students without
/// marks are omitted from the listing entirely.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentAnalyticsEntry {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub average_score: Option<f64>,
    /// Letter band of the average, or "N/A" when the average is absent.
    pub overall_grade: String,
}

impl From<StudentAverageRow> for StudentAnalyticsEntry {
    fn from(row: StudentAverageRow) -> Self {
        let overall_grade = match row.average_score {
            Some(average) => grade_of(average).to_string(),
            None => "N/A".to_string(),
        };
        Self {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            average_score: row.average_score,
            overall_grade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(average: Option<f64>) -> StudentAverageRow {
        StudentAverageRow {
            id: Uuid::new_v4(),
            username: "student".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            average_score: average,
        }
    }

    #[test]
    fn test_overall_grade_reuses_grade_bands() {
        assert_eq!(StudentAnalyticsEntry::from(row(Some(92.0))).overall_grade, "A");
        assert_eq!(StudentAnalyticsEntry::from(row(Some(61.5))).overall_grade, "D");
        assert_eq!(StudentAnalyticsEntry::from(row(Some(12.0))).overall_grade, "F");
    }

    #[test]
    fn test_absent_average_maps_to_na() {
        assert_eq!(StudentAnalyticsEntry::from(row(None)).overall_grade, "N/A");
    }

    #[test]
    fn test_class_entry_preserves_null_average() {
        let entry = ClassAnalyticsEntry::from(SubjectAverageRow {
            name: "Empty".to_string(),
            average_score: None,
        });
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["average_score"], serde_json::Value::Null);
    }
}
