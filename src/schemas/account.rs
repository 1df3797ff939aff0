use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::account::{self, AccountRole};
use crate::models::partner_application::{self, ApplicationStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateInviteRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub company_name: Option<String>,
    pub role: AccountRole,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<account::Model> for AccountResponse {
    fn from(account: account::Model) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            company_name: account.company_name,
            role: account.role,
            is_active: account.is_active,
            last_login_at: account.last_login_at,
            created_at: account.created_at,
        }
    }
}

/// Returned by login and registration alongside the session cookie
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub account: AccountResponse,
}

/// The application a partner account was created from
#[derive(Debug, Clone, Serialize)]
pub struct LinkedApplication {
    pub id: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl From<partner_application::Model> for LinkedApplication {
    fn from(record: partner_application::Model) -> Self {
        Self {
            id: record.id,
            status: record.status,
            created_at: record.created_at,
            reviewed_at: record.reviewed_at,
            redeemed_at: record.redeemed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartnerProfileResponse {
    pub account: AccountResponse,
    pub application: Option<LinkedApplication>,
}
