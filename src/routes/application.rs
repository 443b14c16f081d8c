use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::capture::{MediaObject, WEBM_CONTENT_TYPE};
use crate::dto::application_dto::SubmitApplicationResponse;
use crate::error::{Error, Result};
use crate::form::{FieldKind, FormState};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/submit_application",
    responses(
        (status = 201, description = "Application stored, returns its id"),
        (status = 400, description = "Missing required answers, listed per field"),
        (status = 429, description = "Too many submissions")
    )
)]
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let schema = state.application_service.schema();
    let mut form = FormState::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read form part: {}", e);
        Error::BadRequest(e.to_string())
    })? {
        let name = field.name().unwrap_or_default().to_string();
        let Some(descriptor) = schema.field(&name) else {
            tracing::debug!(part = %name, "ignoring unknown form part");
            continue;
        };

        match descriptor.kind {
            FieldKind::Media => {
                let content_type = field
                    .content_type()
                    .unwrap_or(WEBM_CONTENT_TYPE)
                    .to_string();
                let data = field.bytes().await?;
                form.set_media(&name, MediaObject::new(data, &content_type));
            }
            kind if kind.is_list() => {
                let raw = field.text().await?;
                let items: Vec<String> = if raw.trim().is_empty() {
                    Vec::new()
                } else {
                    serde_json::from_str(&raw).map_err(|_| {
                        Error::BadRequest(format!("{} must be a JSON array of strings", name))
                    })?
                };
                form.set_list(&name, items);
            }
            _ => {
                let value = field.text().await?;
                form.set_text(&name, value);
            }
        }
    }

    let record = state.application_service.submit(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitApplicationResponse {
            status: "success".to_string(),
            id: record.id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/form/schema",
    responses(
        (status = 200, description = "Questions of the application form, in display order")
    )
)]
pub async fn get_form_schema(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.application_service.schema().clone())
}
