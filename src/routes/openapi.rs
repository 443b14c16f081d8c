use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::application::submit_application,
        crate::routes::application::get_form_schema,
        crate::routes::admin::login,
        crate::routes::admin::list_applications,
        crate::routes::admin::get_application,
        crate::routes::admin::update_status,
        crate::routes::admin::stats,
        crate::routes::admin::create_admin,
        crate::routes::admin::list_admins,
    ),
    tags((name = "teacher-recruitment", description = "Teacher applications and admin review"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
