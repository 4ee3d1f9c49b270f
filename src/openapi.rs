//! OpenAPI document assembly.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::{handlers, models};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::subjects::list_subjects,
        handlers::subjects::get_subject,
        handlers::subjects::create_subject,
        handlers::subjects::update_subject,
        handlers::subjects::delete_subject,
        handlers::marks::list_marks,
        handlers::marks::get_mark,
        handlers::marks::create_mark,
        handlers::marks::update_mark,
        handlers::marks::delete_mark,
        handlers::reports::student_report,
        handlers::reports::download_student_report,
        handlers::analytics::class_analytics,
        handlers::analytics::student_analytics,
    ),
    components(schemas(
        models::auth::LoginRequest,
        models::auth::LoginResponse,
        models::auth::LoginUser,
        models::users::Role,
        models::users::UserCreate,
        models::users::UserUpdate,
        models::users::UserResponse,
        models::subjects::SubjectCreate,
        models::subjects::SubjectUpdate,
        models::subjects::SubjectResponse,
        models::marks::MarkCreate,
        models::marks::MarkUpdate,
        models::marks::MarkResponse,
        models::reports::ReportMark,
        models::reports::StudentReport,
        models::reports::StudentReportResponse,
        models::analytics::ClassAnalyticsEntry,
        models::analytics::StudentAnalyticsEntry,
        crate::grading::Grade,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "authentication", description = "Login and token issuance"),
        (name = "users", description = "User management"),
        (name = "subjects", description = "Subject management"),
        (name = "marks", description = "Mark recording"),
        (name = "reports", description = "Student report cards"),
        (name = "analytics", description = "Aggregate statistics"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
