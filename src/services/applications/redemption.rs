use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use super::store::{is_unique_violation, ApplicationStore};
use super::ApplicationError;
use crate::models::account::{self, AccountRole};
use crate::models::partner_application;
use crate::services::security::hash_password;
use crate::services::validation::{normalize_email, normalize_optional};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Result of a successful invite check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteValidation {
    pub valid: bool,
    pub application_id: String,
    pub email: String,
    pub name: String,
    pub company_name: Option<String>,
}

impl From<&partner_application::Model> for InviteValidation {
    fn from(record: &partner_application::Model) -> Self {
        Self {
            valid: true,
            application_id: record.id.clone(),
            email: record.email.clone(),
            name: record.name.clone(),
            company_name: record.company_name.clone(),
        }
    }
}

/// Account sign-up with an invite code
#[derive(Debug, Clone, Deserialize)]
pub struct Redemption {
    pub email: String,
    pub code: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone)]
pub struct RedemptionHandler {
    store: ApplicationStore,
}

impl RedemptionHandler {
    pub fn new(store: ApplicationStore) -> Self {
        Self { store }
    }

    /// Check an email/code pair without consuming it. Every kind of mismatch
    /// yields the same error.
    pub async fn validate(
        &self,
        email: &str,
        code: &str,
    ) -> Result<InviteValidation, ApplicationError> {
        let email = normalize_email(email);
        let code = code.trim();
        if email.is_empty() || code.is_empty() {
            return Err(ApplicationError::InvalidOrExpiredCode);
        }

        let record = self
            .store
            .find_redeemable(&email, code, Utc::now())
            .await?
            .ok_or(ApplicationError::InvalidOrExpiredCode)?;

        Ok(InviteValidation::from(&record))
    }

    /// Consume the invite and create the partner account in one transaction
    pub async fn redeem(&self, redemption: Redemption) -> Result<account::Model, ApplicationError> {
        if redemption.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApplicationError::validation(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }

        let invite = self.validate(&redemption.email, &redemption.code).await?;
        let hashed_password = hash_password(&redemption.password)
            .map_err(|e| ApplicationError::Security(e.to_string()))?;
        let name = normalize_optional(redemption.name).unwrap_or_else(|| invite.name.clone());

        let now = Utc::now();
        let txn = self.store.db().begin().await?;

        let consumed = ApplicationStore::consume_invite_in(
            &txn,
            &invite.email,
            redemption.code.trim(),
            now,
        )
        .await?;
        if !consumed {
            txn.rollback().await?;
            return Err(ApplicationError::InvalidOrExpiredCode);
        }

        let new_account = account::ActiveModel {
            email: Set(invite.email.clone()),
            name: Set(name),
            company_name: Set(invite.company_name.clone()),
            hashed_password: Set(hashed_password),
            role: Set(AccountRole::Partner),
            is_active: Set(true),
            application_id: Set(Some(invite.application_id.clone())),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = match new_account.insert(&txn).await {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => {
                txn.rollback().await?;
                return Err(ApplicationError::DuplicateAccount);
            }
            Err(e) => {
                txn.rollback().await?;
                return Err(e.into());
            }
        };

        txn.commit().await?;

        tracing::info!(
            account_id = created.id,
            application_id = %invite.application_id,
            "Invite redeemed, partner account created"
        );

        Ok(created)
    }
}
