//! Shared fixtures for the integration tests: an in-memory database, a
//! recording mailer and request helpers for driving the router.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;
use tokio::sync::Mutex;
use tower::util::ServiceExt;

use partner_portal::config::portal::PortalConfig;
use partner_portal::endpoints::create_router;
use partner_portal::migrations::Migrator;
use partner_portal::models::account::{self, AccountRole};
use partner_portal::services::notification::{EmailMessage, Mailer, SendResult};
use partner_portal::services::security::hash_password;
use partner_portal::services::{AccountDirectory, DbAccountDirectory, NotificationService};
use partner_portal::state::AppState;

pub const OPERATOR_EMAIL: &str = "ops@portal.test";
pub const ADMIN_EMAIL: &str = "admin@portal.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    // Each in-memory connection is its own database, so keep a single one
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Create an active account and return the model
pub async fn create_test_account(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    role: AccountRole,
) -> account::Model {
    let now = chrono::Utc::now();

    let new_account = account::ActiveModel {
        email: Set(email.to_string()),
        name: Set("Test Account".to_string()),
        company_name: Set(None),
        hashed_password: Set(hash_password(password).unwrap()),
        role: Set(role),
        is_active: Set(true),
        application_id: Set(None),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_account.insert(db).await.unwrap()
}

// ============================================================================
// Test doubles
// ============================================================================

/// Mailer that records every message and optionally reports failure
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_to(&self, recipient: &str) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.to == recipient)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn provider_name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, message: &EmailMessage) -> SendResult {
        self.sent.lock().await.push(message.clone());
        if self.fail {
            SendResult::failed("simulated delivery failure")
        } else {
            SendResult::sent()
        }
    }
}

/// Directory whose lookups always fail
pub struct UnavailableDirectory;

#[async_trait]
impl AccountDirectory for UnavailableDirectory {
    async fn partner_exists(&self, _email: &str) -> Result<bool, DbErr> {
        Err(DbErr::Custom("directory unreachable".to_string()))
    }
}

// ============================================================================
// App construction
// ============================================================================

pub fn test_portal_config() -> PortalConfig {
    PortalConfig {
        site_url: "https://portal.test".to_string(),
        invite_validity_days: 7,
    }
}

pub fn build_app_state_with(
    db: DatabaseConnection,
    mailer: Arc<RecordingMailer>,
    directory: Arc<dyn AccountDirectory>,
) -> AppState {
    let notification = NotificationService::new(mailer, OPERATOR_EMAIL);
    AppState::new(db, notification, directory, &test_portal_config())
}

/// Router over a fresh database with a working mailer and an admin account
pub async fn test_app() -> (Router, DatabaseConnection, Arc<RecordingMailer>) {
    let db = create_test_db().await;
    create_test_account(&db, ADMIN_EMAIL, ADMIN_PASSWORD, AccountRole::Admin).await;

    let mailer = Arc::new(RecordingMailer::default());
    let directory = Arc::new(DbAccountDirectory::new(db.clone()));
    let state = build_app_state_with(db.clone(), mailer.clone(), directory);

    (create_router(state), db, mailer)
}

// ============================================================================
// Request helpers
// ============================================================================

pub fn json_request(
    method: &str,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn read_json(response: Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// `name=value` pair from a response's `Set-Cookie` header
pub fn session_cookie(response: &Response) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(|pair| pair.trim().to_string())
}

/// Log in and return the session cookie pair
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/auth/login",
            serde_json::json!({ "email": email, "password": password }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login failed for {}", email);
    session_cookie(&response).expect("login must set a session cookie")
}

pub async fn admin_cookie(app: &Router) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

pub fn application_body(email: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "Jo Partner",
        "email": email,
        "phone": "0123",
        "company": "Calm & Co",
        "description": "We deliver resilience workshops for small teams."
    })
}

/// Submit an application and return its id
pub async fn submit_application(app: &Router, email: &str) -> String {
    let response = send(
        app,
        json_request("POST", "/api/applications", application_body(email), None),
    )
    .await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "intake failed: {}", body);
    body["application_id"].as_str().unwrap().to_string()
}

/// Review an application as the seeded admin
pub async fn review(app: &Router, id: &str, decision: &str) -> (StatusCode, serde_json::Value) {
    let cookie = admin_cookie(app).await;
    let response = send(
        app,
        json_request(
            "POST",
            &format!("/api/admin/applications/{}/review", id),
            serde_json::json!({ "decision": decision }),
            Some(&cookie),
        ),
    )
    .await;
    read_json(response).await
}

/// The invite code currently stored for an application
pub async fn stored_invite_code(db: &DatabaseConnection, id: &str) -> Option<String> {
    use partner_portal::models::prelude::PartnerApplication;
    use sea_orm::EntityTrait;

    PartnerApplication::find_by_id(id.to_string())
        .one(db)
        .await
        .unwrap()
        .and_then(|record| record.invite_code)
}
