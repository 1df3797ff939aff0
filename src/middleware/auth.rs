//! Session authentication for protected API routes.
//!
//! Accepts the `portal_session` cookie or an `Authorization: Bearer` header.
//! On success the active account is placed in the request extensions as a
//! [`RequestContext`].

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::models::account;
use crate::models::prelude::*;
use crate::services::security::decode_token;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "portal_session";

/// Per-request identity of the caller
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub account: account::Model,
}

impl RequestContext {
    /// Reviewer identity recorded on applications
    pub fn actor(&self) -> &str {
        &self.account.email
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match extract_token(req.headers()) {
        Some(t) => t,
        None => return unauthorized_response("Authentication required"),
    };

    let account = match load_account(&state, &token).await {
        Ok(a) => a,
        Err(msg) => return unauthorized_response(&msg),
    };

    req.extensions_mut().insert(RequestContext { account });

    next.run(req).await
}

/// Session token from the cookie, falling back to a Bearer header
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    extract_session_cookie(headers).or_else(|| {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        value
            .strip_prefix("Bearer ")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE_NAME && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

async fn load_account(state: &AppState, token: &str) -> Result<account::Model, String> {
    let claims = decode_token(token).map_err(|_| "Invalid or expired session".to_string())?;

    let account_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| "Invalid token subject".to_string())?;

    let found = Account::find_by_id(account_id)
        .filter(account::Column::IsActive.eq(true))
        .one(&state.db)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load session account");
            "Unable to verify session".to_string()
        })?;

    found.ok_or_else(|| "Account not found or inactive".to_string())
}

/// `Set-Cookie` value carrying a session token
pub fn create_session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        SESSION_COOKIE_NAME,
        token,
        max_age_secs,
        if secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{}",
        SESSION_COOKIE_NAME,
        if secure { "; Secure" } else { "" }
    )
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "detail": message
        })),
    )
        .into_response()
}
