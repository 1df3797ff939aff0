use std::env;

/// Default and upper bound for `PORTAL_INVITE_VALIDITY_DAYS`
pub const DEFAULT_INVITE_VALIDITY_DAYS: i64 = 7;
pub const MAX_INVITE_VALIDITY_DAYS: i64 = 365;

/// Partner application workflow settings
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Public site URL used to build sign-up links in invite emails
    pub site_url: String,
    /// Days an invite code stays redeemable after approval
    pub invite_validity_days: i64,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        Self {
            site_url: env::var("PORTAL_SITE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            invite_validity_days: parse_invite_validity_days(
                env::var("PORTAL_INVITE_VALIDITY_DAYS").ok().as_deref(),
            ),
        }
    }
}

/// Unset, unparsable or non-positive values fall back to the default; large
/// values are capped at [`MAX_INVITE_VALIDITY_DAYS`]
pub fn parse_invite_validity_days(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|d| *d > 0)
        .map(|d| d.min(MAX_INVITE_VALIDITY_DAYS))
        .unwrap_or(DEFAULT_INVITE_VALIDITY_DAYS)
}
