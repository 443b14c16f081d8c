pub mod admin;
pub mod application;
pub mod health;
pub mod openapi;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    auth::{require_admin, require_super_admin},
    cors::cors_layer,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api/form/schema", get(application::get_form_schema))
        .route("/api/admin/login", post(admin::login))
        .route("/api/openapi.json", get(openapi::openapi_json));

    let public_api = Router::new()
        .route("/submit_application", post(application::submit_application))
        .layer(from_fn_with_state(
            RateLimiter::new(config.public_rps),
            rps_middleware,
        ));

    let review_api = Router::new()
        .route("/api/admin/applications", get(admin::list_applications))
        .route("/api/admin/applications/:id", get(admin::get_application))
        .route(
            "/api/admin/applications/:id/status",
            post(admin::update_status),
        )
        .route("/api/admin/stats", get(admin::stats))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let super_admin_api = Router::new()
        .route(
            "/api/admin/admins",
            get(admin::list_admins).post(admin::create_admin),
        )
        .route_layer(from_fn_with_state(state.clone(), require_super_admin));

    tracing::info!("Serving uploads from: {}", config.uploads_dir);

    base_routes
        .merge(public_api)
        .merge(review_api)
        .merge(super_admin_api)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .with_state(state)
        .layer(cors_layer(config.cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
}
