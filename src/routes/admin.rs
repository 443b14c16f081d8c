use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::dto::admin_dto::{CreateAdminRequest, LoginRequest};
use crate::dto::application_dto::{ListApplicationsQuery, UpdateStatusRequest};
use crate::error::Result;
use crate::utils::token::Claims;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/admin/login",
    responses(
        (status = 200, description = "Bearer token and the admin's identity"),
        (status = 401, description = "Invalid email or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let resp = state.admin_service.login(payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/applications",
    params(
        ("status" = Option<String>, Query, description = "pending, approved or rejected")
    ),
    responses(
        (status = 200, description = "Applications, newest first"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListApplicationsQuery>,
) -> Result<impl IntoResponse> {
    let records = state.application_service.list(query.status).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/admin/applications/{id}",
    params(
        ("id" = String, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "The application"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let record = state.application_service.get(id).await?;
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/api/admin/applications/{id}/status",
    params(
        ("id" = String, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application approved or rejected"),
        (status = 400, description = "Target status is pending"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application was already reviewed")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let record = state
        .application_service
        .set_status(id, payload.status, &claims.sub)
        .await?;
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Status counts and applicant analytics")
    )
)]
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.application_service.stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    post,
    path = "/api/admin/admins",
    responses(
        (status = 201, description = "Admin created"),
        (status = 403, description = "Only super admins can add admins"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn create_admin(
    State(state): State<AppState>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<impl IntoResponse> {
    let admin = state.admin_service.create_admin(payload).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

#[utoipa::path(
    get,
    path = "/api/admin/admins",
    responses(
        (status = 200, description = "All admin accounts"),
        (status = 403, description = "Only super admins can list admins")
    )
)]
pub async fn list_admins(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let admins = state.admin_service.list_admins().await?;
    Ok(Json(admins))
}
