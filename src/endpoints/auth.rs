use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_session_cookie, create_session_cookie};
use crate::models::account;
use crate::schemas::{AccountResponse, LoginRequest, SessionResponse, ValidateInviteRequest};
use crate::services::accounts;
use crate::services::applications::{InviteValidation, Redemption};
use crate::services::security::create_session_token;
use crate::state::AppState;

/// Create auth routes for sessions and invite sign-up
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/invites/validate", post(validate_invite))
        .route("/register", post(register))
        .with_state(state)
}

// ============================================================================
// Session Cookie Helpers
// ============================================================================

fn session_cookie_header(account: &account::Model) -> Result<HeaderValue> {
    let token = create_session_token(account, None)?;
    let cookie = create_session_cookie(
        &token,
        CONFIG.auth.session_ttl_secs,
        CONFIG.auth.secure_cookies,
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))
}

fn session_response(status: StatusCode, account: account::Model) -> Result<Response> {
    let cookie = session_cookie_header(&account)?;
    let body = Json(SessionResponse {
        success: true,
        account: AccountResponse::from(account),
    });

    Ok((status, [(header::SET_COOKIE, cookie)], body).into_response())
}

// ============================================================================
// Session Management Endpoints
// ============================================================================

/// Login with email and password, returns a session cookie
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response> {
    let account = accounts::authenticate(&state.db, &request.email, &request.password).await?;
    session_response(StatusCode::OK, account)
}

/// Logout - clears the session cookie
async fn logout() -> Response {
    let cookie = HeaderValue::from_str(&clear_session_cookie(CONFIG.auth.secure_cookies))
        .unwrap_or_else(|_| HeaderValue::from_static("portal_session=; Path=/; Max-Age=0"));

    (
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "success": true, "message": "Logged out" })),
    )
        .into_response()
}

// ============================================================================
// Invite Sign-up Endpoints
// ============================================================================

/// Check an invite code before showing the sign-up form
async fn validate_invite(
    State(state): State<AppState>,
    Json(request): Json<ValidateInviteRequest>,
) -> Result<Json<InviteValidation>> {
    let validation = state
        .redemption
        .validate(&request.email, &request.code)
        .await?;
    Ok(Json(validation))
}

/// Redeem an invite code, create the partner account and sign it in
async fn register(
    State(state): State<AppState>,
    Json(request): Json<Redemption>,
) -> Result<Response> {
    let account = state.redemption.redeem(request).await?;
    session_response(StatusCode::CREATED, account)
}
