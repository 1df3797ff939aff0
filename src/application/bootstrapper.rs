//! Application bootstrapper
//!
//! Handles all initialization and setup for the partner portal backend.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, CONFIG};
use crate::db;
use crate::endpoints;
use crate::middleware::security_headers;
use crate::services::{accounts, DbAccountDirectory, NotificationService};
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting partner portal backend v{}", env!("CARGO_PKG_VERSION"));

    let state = init_services().await?;
    let app = create_app(state, &CONFIG.server.allowed_origins);

    serve(app).await
}

/// Initialize tracing/logging
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("partner_portal={}", CONFIG.log_level).into());

    match CONFIG.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_ansi(false))
            .init(),
    }
}

/// Initialize all application services
async fn init_services() -> anyhow::Result<AppState> {
    let conn = db::connect().await?;
    tracing::info!("Database connection established");

    seed_admin(&conn).await;

    let notification = NotificationService::from_config(&CONFIG.notification)?;
    if CONFIG.notification.operator_address.is_empty() {
        tracing::warn!("PORTAL_OPERATOR_EMAIL not set, operator notifications will fail");
    }

    let directory = Arc::new(DbAccountDirectory::new(conn.clone()));

    Ok(AppState::new(conn, notification, directory, &CONFIG.portal))
}

/// Create the configured admin account on first start
async fn seed_admin(conn: &db::DbConn) {
    let (Some(email), Some(password)) = (
        CONFIG.auth.bootstrap_admin_email.as_deref(),
        CONFIG.auth.bootstrap_admin_password.as_deref(),
    ) else {
        return;
    };

    if let Err(e) = accounts::ensure_admin(conn, email, password).await {
        tracing::warn!("Failed to seed admin account: {}", e);
    }
}

/// Create the main application router with CORS, tracing and security
/// headers applied
pub fn create_app(state: AppState, allowed_origins: &[String]) -> Router {
    endpoints::create_router(state)
        .layer(axum_middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
}

/// With no origins configured any origin is allowed, without credentials.
/// A configured list allows credentials so the session cookie is sent.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Start the HTTP server
async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", CONFIG.server.host, CONFIG.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
