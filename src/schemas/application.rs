use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::partner_application::{self, ApplicationStatus};
use crate::services::applications::{ApplicationPage, ReviewDecision};

/// Public response after a successful submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    pub application_id: String,
}

/// Row in the admin application list
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company_name: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<partner_application::Model> for ApplicationSummary {
    fn from(record: partner_application::Model) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            company_name: record.company_name,
            status: record.status,
            created_at: record.created_at,
            reviewed_at: record.reviewed_at,
        }
    }
}

/// Full application as shown to admins. `invite_code` is present only while
/// the invite is outstanding, so a reviewer can pass it on by hand when the
/// invite email did not arrive.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetail {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company_name: Option<String>,
    pub description: String,
    pub status: ApplicationStatus,
    pub invite_code: Option<String>,
    pub code_expires_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<partner_application::Model> for ApplicationDetail {
    fn from(record: partner_application::Model) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            company_name: record.company_name,
            description: record.description,
            status: record.status,
            invite_code: record.invite_code,
            code_expires_at: record.code_expires_at,
            reviewed_by: record.reviewed_by,
            reviewed_at: record.reviewed_at,
            admin_notes: record.admin_notes,
            redeemed_at: record.redeemed_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNotesRequest {
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        Self {
            items,
            total,
            page,
            per_page,
            total_pages: total.div_ceil(per_page.max(1)),
        }
    }
}

impl From<ApplicationPage> for Paginated<ApplicationSummary> {
    fn from(page: ApplicationPage) -> Self {
        let items = page.items.into_iter().map(ApplicationSummary::from).collect();
        Paginated::new(items, page.total, page.page, page.per_page)
    }
}
