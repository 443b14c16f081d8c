use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::models::admin::AdminRole;
use crate::utils::token::{decode_token, Claims};
use crate::AppState;

fn reject(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

fn bearer_claims(req: &Request, secret: &str) -> Result<Claims, Response> {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "missing_authorization"));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(reject(StatusCode::UNAUTHORIZED, "bad_authorization"));
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(reject(StatusCode::UNAUTHORIZED, "unsupported_scheme"));
    };
    decode_token(secret, token).map_err(|_| reject(StatusCode::UNAUTHORIZED, "invalid_token"))
}

async fn require_roles(state: AppState, mut req: Request, next: Next, allowed: &[AdminRole]) -> Response {
    let claims = match bearer_claims(&req, &state.config.jwt_secret) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    if !allowed.contains(&claims.role) {
        tracing::info!(email = %claims.sub, role = %claims.role, "admin route forbidden");
        return reject(StatusCode::FORBIDDEN, "forbidden");
    }
    req.extensions_mut().insert(claims);
    next.run(req).await
}

/// Any signed-in admin.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(state, req, next, &[AdminRole::Admin, AdminRole::SuperAdmin]).await
}

pub async fn require_super_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    require_roles(state, req, next, &[AdminRole::SuperAdmin]).await
}
