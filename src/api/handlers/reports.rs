use crate::{
    api::models::{
        reports::{ReportMark, StudentReport, StudentReportResponse},
        users::CurrentUser,
    },
    auth::permissions::require_student,
    db::{errors::DbError, handlers::Marks},
    errors::Error,
    grading, report, AppState,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};

/// Fetch the requester's marks and fold them into a report. `None` when the
/// student has no marks yet.
async fn build_report(state: &AppState, current_user: &CurrentUser) -> Result<Option<StudentReport>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(DbError::from(e)))?;
    let mut repo = Marks::new(&mut conn);

    let rows = repo.list_for_student(current_user.id).await?;
    let scores: Vec<f64> = rows.iter().map(|r| r.score).collect();

    let Some(summary) = grading::summarize(&scores) else {
        return Ok(None);
    };

    let marks: Vec<ReportMark> = rows.into_iter().map(ReportMark::from).collect();
    Ok(Some(StudentReport::new(current_user.full_name(), marks, summary)))
}

// GET /student/report/ - The requester's own report card (student only)
#[utoipa::path(
    get,
    path = "/student/report/",
    tag = "reports",
    responses(
        (status = 200, description = "Report card, or a no-marks message", body = StudentReportResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - students only"),
    ),
    security(("bearer_token" = []))
)]
pub async fn student_report(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<StudentReportResponse>, Error> {
    require_student(&current_user, "read", "their report")?;

    match build_report(&state, &current_user).await? {
        Some(report) => Ok(Json(StudentReportResponse::Report(report))),
        None => Ok(Json(StudentReportResponse::no_marks())),
    }
}

// GET /student/report/download/ - The same report rendered to PDF
#[utoipa::path(
    get,
    path = "/student/report/download/",
    tag = "reports",
    responses(
        (status = 200, description = "PDF report card", content_type = "application/pdf"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - students only"),
        (status = 404, description = "No marks available"),
    ),
    security(("bearer_token" = []))
)]
pub async fn download_student_report(State(state): State<AppState>, current_user: CurrentUser) -> Result<Response, Error> {
    require_student(&current_user, "download", "their report")?;

    let Some(report) = build_report(&state, &current_user).await? else {
        return Ok((StatusCode::NOT_FOUND, "No marks available.").into_response());
    };

    let pdf = report::render_pdf(&report)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"grade_report.pdf\""),
        ],
        pdf,
    )
        .into_response())
}
