use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::store::{ApplicationStore, StatusChange};
use super::ApplicationError;
use crate::config::portal::MAX_INVITE_VALIDITY_DAYS;
use crate::models::partner_application::{self, ApplicationStatus};
use crate::services::notification::{templates, EmailMessage, NotificationService};
use crate::services::security::generate_invite_code;
use crate::services::validation::normalize_optional;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

#[derive(Clone)]
pub struct ReviewHandler {
    store: ApplicationStore,
    notification: NotificationService,
    invite_validity: Duration,
    site_url: String,
}

impl ReviewHandler {
    pub fn new(
        store: ApplicationStore,
        notification: NotificationService,
        invite_validity_days: i64,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notification,
            invite_validity: Duration::days(
                invite_validity_days.clamp(1, MAX_INVITE_VALIDITY_DAYS),
            ),
            site_url: site_url.into(),
        }
    }

    /// Approve or reject a pending application on behalf of `reviewer`.
    ///
    /// Approval issues a fresh invite code and emails it to the applicant.
    /// The email is best-effort; the approval stands either way.
    pub async fn review(
        &self,
        reviewer: &str,
        id: &str,
        decision: ReviewDecision,
        notes: Option<String>,
    ) -> Result<partner_application::Model, ApplicationError> {
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::NotFound)?;
        if current.status != ApplicationStatus::Pending {
            return Err(ApplicationError::InvalidTransition {
                current: current.status,
            });
        }

        let now = Utc::now();
        let admin_notes = normalize_optional(notes);
        let change = match decision {
            ReviewDecision::Approve => StatusChange {
                status: ApplicationStatus::Approved,
                reviewed_by: reviewer.to_string(),
                admin_notes,
                invite_code: Some(generate_invite_code()),
                code_expires_at: Some(now + self.invite_validity),
            },
            ReviewDecision::Reject => StatusChange {
                status: ApplicationStatus::Rejected,
                reviewed_by: reviewer.to_string(),
                admin_notes,
                invite_code: None,
                code_expires_at: None,
            },
        };

        if !self.store.transition_from_pending(id, &change, now).await? {
            let latest = self
                .store
                .find_by_id(id)
                .await?
                .ok_or(ApplicationError::NotFound)?;
            return Err(ApplicationError::InvalidTransition {
                current: latest.status,
            });
        }

        let updated = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::NotFound)?;

        tracing::info!(
            application_id = %updated.id,
            status = %updated.status,
            reviewer = %reviewer,
            "Partner application reviewed"
        );

        if let (Some(code), Some(expires_at)) = (&change.invite_code, &change.code_expires_at) {
            let invite = templates::invite_issued(&updated, code, expires_at, &self.site_url);
            self.notification
                .send(&EmailMessage {
                    to: updated.email.clone(),
                    subject: invite.subject,
                    text_body: invite.text_body,
                    html_body: invite.html_body,
                })
                .await;
        }

        Ok(updated)
    }

    pub async fn update_notes(
        &self,
        id: &str,
        notes: Option<String>,
    ) -> Result<partner_application::Model, ApplicationError> {
        self.store
            .update_notes(id, normalize_optional(notes))
            .await?
            .ok_or(ApplicationError::NotFound)
    }
}
