//! API response models for student reports.

use crate::db::models::marks::StudentSubjectScore;
use crate::grading::{self, Grade, GradeSummary};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One line of a report card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportMark {
    pub subject: String,
    pub score: f64,
    pub grade: Grade,
}

impl From<StudentSubjectScore> for ReportMark {
    fn from(row: StudentSubjectScore) -> Self {
        Self {
            grade: grading::grade_of(row.score),
            subject: row.subject_name,
            score: row.score,
        }
    }
}

/// A student's full report card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentReport {
    pub student_name: String,
    pub marks: Vec<ReportMark>,
    pub total_score: f64,
    /// Rounded to two decimal places for presentation.
    pub percentage: f64,
    pub overall_grade: Grade,
}

impl StudentReport {
    pub fn new(student_name: String, marks: Vec<ReportMark>, summary: GradeSummary) -> Self {
        Self {
            student_name,
            marks,
            total_score: summary.total_score,
            percentage: grading::round2(summary.percentage),
            overall_grade: summary.overall_grade,
        }
    }
}

/// JSON body of `GET /student/report/`: either a full report or an explicit
/// "no marks yet" message, never an empty/zeroed report object.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum StudentReportResponse {
    Report(StudentReport),
    NoMarks { message: String },
}

impl StudentReportResponse {
    pub fn no_marks() -> Self {
        Self::NoMarks {
            message: "No marks have been entered for you yet.".to_string(),
        }
    }
}
