pub mod admin;
pub mod applications;
pub mod auth;
pub mod enquiries;
pub mod partner;

use axum::{
    extract::State, http::StatusCode, middleware as axum_middleware, routing::get, Json, Router,
};

use crate::config::CONFIG;
use crate::middleware::require_auth;
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/version", get(get_version))
        .with_state(state.clone())
        .nest(
            "/api/applications",
            applications::application_routes(state.clone()),
        )
        .nest("/api/enquiries", enquiries::enquiry_routes(state.clone()))
        .nest("/auth", auth::auth_routes(state.clone()));

    // Protected routes (session required, role checked per handler)
    let protected_routes = Router::new()
        .nest("/api/admin", admin::admin_routes(state.clone()))
        .nest("/api/partner", partner::partner_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    public_routes.merge(protected_routes)
}

/// Health check endpoint, includes a database ping
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "degraded", "database": "unreachable" })),
            )
        }
    }
}

/// Version info endpoint
async fn get_version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "version": CONFIG.version,
        "commit_hash": CONFIG.commit_hash,
        "build_time": CONFIG.build_time,
    }))
}
