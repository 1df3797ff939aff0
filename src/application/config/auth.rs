use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens. When unset a random
    /// per-process secret is generated, which invalidates sessions on restart.
    pub jwt_secret: Option<String>,
    pub session_ttl_secs: i64,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    /// Admin account created at startup if it does not exist yet
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: env::var("PORTAL_JWT_SECRET").ok().filter(|s| !s.is_empty()),
            session_ttl_secs: env::var("PORTAL_SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(604800),
            secure_cookies: env::var("PORTAL_SECURE_COOKIES")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
            bootstrap_admin_email: env::var("PORTAL_ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            bootstrap_admin_password: env::var("PORTAL_ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}
