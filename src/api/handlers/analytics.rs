use crate::{
    api::models::{
        analytics::{ClassAnalyticsEntry, StudentAnalyticsEntry},
        users::CurrentUser,
    },
    auth::permissions::{is_admin, is_teacher, require_any},
    db::handlers::analytics,
    errors::Error,
    AppState,
};
use axum::{extract::State, response::Json};

// GET /analytics/class/ - Average score per subject (admin or teacher)
#[utoipa::path(
    get,
    path = "/analytics/class/",
    tag = "analytics",
    responses(
        (status = 200, description = "Per-subject averages; null for subjects without marks", body = [ClassAnalyticsEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_token" = []))
)]
pub async fn class_analytics(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<ClassAnalyticsEntry>>, Error> {
    require_any(&current_user, &[is_admin, is_teacher], "read", "class analytics")?;

    let rows = analytics::class_averages(&state.db).await?;
    Ok(Json(rows.into_iter().map(ClassAnalyticsEntry::from).collect()))
}

// GET /analytics/students/ - Average score per student (admin or teacher)
#[utoipa::path(
    get,
    path = "/analytics/students/",
    tag = "analytics",
    responses(
        (status = 200, description = "Per-student averages; students without marks are omitted", body = [StudentAnalyticsEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_token" = []))
)]
pub async fn student_analytics(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<StudentAnalyticsEntry>>, Error> {
    require_any(&current_user, &[is_admin, is_teacher], "read", "student analytics")?;

    let rows = analytics::student_averages(&state.db).await?;
    Ok(Json(rows.into_iter().map(StudentAnalyticsEntry::from).collect()))
}

#[cfg(test)]
mod tests {
    use crate::api::models::users::Role;
    use crate::test_utils::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_class_analytics_reports_null_for_empty_subjects(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let (teacher, teacher_token) = create_test_user(&pool, Role::Teacher).await;
        let (student, _) = create_test_user(&pool, Role::Student).await;
        let maths = create_test_subject(&pool, "Maths", teacher.id).await;
        create_test_subject(&pool, "Untaught", teacher.id).await;
        create_test_mark(&pool, student.id, maths.id, 64.0).await;

        let response = app.get("/analytics/class/").authorization_bearer(&teacher_token).await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], "Maths");
        assert_eq!(entries[0]["average_score"], 64.0);
        assert_eq!(entries[1]["name"], "Untaught");
        assert_eq!(entries[1]["average_score"], serde_json::Value::Null);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_student_analytics_grades_and_omissions(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let (teacher, _) = create_test_user(&pool, Role::Teacher).await;
        let (_, admin_token) = create_test_user(&pool, Role::Admin).await;
        let (graded, _) = create_test_user(&pool, Role::Student).await;
        create_test_user(&pool, Role::Student).await; // never marked
        let maths = create_test_subject(&pool, "Maths", teacher.id).await;
        let physics = create_test_subject(&pool, "Physics", teacher.id).await;
        create_test_mark(&pool, graded.id, maths.id, 95.0).await;
        create_test_mark(&pool, graded.id, physics.id, 85.0).await;

        let response = app.get("/analytics/students/").authorization_bearer(&admin_token).await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"], serde_json::json!(graded.id));
        assert_eq!(entries[0]["average_score"], 90.0);
        assert_eq!(entries[0]["overall_grade"], "A");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_analytics_forbidden_for_students(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let (_, student_token) = create_test_user(&pool, Role::Student).await;

        app.get("/analytics/class/").authorization_bearer(&student_token).await.assert_status_forbidden();
        app.get("/analytics/students/")
            .authorization_bearer(&student_token)
            .await
            .assert_status_forbidden();
    }
}
