//! Grade band computation and mark aggregation.
//!
//! The grading scale is fixed: 90 and above is an A, then 80/70/60 for B/C/D,
//! and everything below 60 (including negative scores) is an F. The same
//! bands are applied to single scores, report percentages, and analytics
//! averages.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Letter grade band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{letter}")
    }
}

/// Map a score to its grade band. Total over all finite scores: anything
/// below 60, negative values included, lands on F.
pub fn grade_of(score: f64) -> Grade {
    if score >= 90.0 {
        Grade::A
    } else if score >= 80.0 {
        Grade::B
    } else if score >= 70.0 {
        Grade::C
    } else if score >= 60.0 {
        Grade::D
    } else {
        Grade::F
    }
}

/// Aggregate view over a set of marks.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSummary {
    pub total_score: f64,
    pub percentage: f64,
    pub overall_grade: Grade,
}

/// Summarize a list of scores into a total, a percentage and an overall
/// grade. Returns `None` for an empty list so callers can render an explicit
/// "no marks yet" state instead of a zero report.
///
/// The percentage divides by (count * 100), which only reads as a true
/// percentage while individual scores stay within 0..=100. Scores are not
/// bounded anywhere, so the value can exceed 100; that behavior is kept
/// as-is.
pub fn summarize(scores: &[f64]) -> Option<GradeSummary> {
    if scores.is_empty() {
        return None;
    }

    let total_score: f64 = scores.iter().sum();
    let percentage = (total_score / (scores.len() as f64 * 100.0)) * 100.0;

    Some(GradeSummary {
        total_score,
        percentage,
        overall_grade: grade_of(percentage),
    })
}

/// Round to two decimal places for presentation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
