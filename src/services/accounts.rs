//! Portal accounts: credential checks, partner listings and admin seeding.

use chrono::Utc;
use once_cell::sync::Lazy;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::account::{self, AccountRole};
use crate::models::partner_application;
use crate::models::prelude::*;
use crate::services::applications::store::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::services::security::{hash_password, verify_password};
use crate::services::validation::normalize_email;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Compared against when the email is unknown, so both login failures cost a
/// bcrypt verification
static DUMMY_PASSWORD_HASH: Lazy<String> =
    Lazy::new(|| bcrypt::hash("dummy-password", bcrypt::DEFAULT_COST).unwrap_or_default());

/// Check an email/password pair and stamp `last_login_at` on success
pub async fn authenticate(db: &DbConn, email: &str, password: &str) -> Result<account::Model> {
    let email = normalize_email(email);

    let Some(found) = Account::find()
        .filter(account::Column::Email.eq(&email))
        .one(db)
        .await?
    else {
        verify_password(password, &DUMMY_PASSWORD_HASH);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(password, &found.hashed_password) {
        tracing::info!(account_id = found.id, "Login rejected: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }
    if !found.is_active {
        return Err(AppError::Unauthorized("Account is disabled".to_string()));
    }

    let now = Utc::now();
    let mut active: account::ActiveModel = found.into();
    active.last_login_at = Set(Some(now));
    active.updated_at = Set(now);
    let updated = active.update(db).await?;

    tracing::info!(account_id = updated.id, role = updated.role.as_str(), "Login succeeded");
    Ok(updated)
}

/// Newest-first page of partner accounts. `page` is 1-based.
pub async fn list_partners(
    db: &DbConn,
    page: Option<u64>,
    per_page: Option<u64>,
) -> Result<(Vec<account::Model>, u64, u64, u64)> {
    let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let page = page.unwrap_or(1).max(1);

    let paginator = Account::find()
        .filter(account::Column::Role.eq(AccountRole::Partner))
        .order_by_desc(account::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok((items, total, page, per_page))
}

pub async fn count_partners(db: &DbConn) -> Result<u64> {
    Ok(Account::find()
        .filter(account::Column::Role.eq(AccountRole::Partner))
        .count(db)
        .await?)
}

/// The application a partner account was created from, if any
pub async fn linked_application(
    db: &DbConn,
    account: &account::Model,
) -> Result<Option<partner_application::Model>> {
    match &account.application_id {
        Some(id) => Ok(PartnerApplication::find_by_id(id.clone()).one(db).await?),
        None => Ok(None),
    }
}

/// Create the configured admin account if it does not exist yet. An existing
/// account is left untouched.
pub async fn ensure_admin(db: &DbConn, email: &str, password: &str) -> Result<bool> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Ok(false);
    }

    let existing = Account::find()
        .filter(account::Column::Email.eq(&email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    let now = Utc::now();
    let admin = account::ActiveModel {
        email: Set(email.clone()),
        name: Set("Administrator".to_string()),
        company_name: Set(None),
        hashed_password: Set(hash_password(password)?),
        role: Set(AccountRole::Admin),
        is_active: Set(true),
        application_id: Set(None),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    admin.insert(db).await?;

    tracing::info!("Seeded admin account from configuration");
    Ok(true)
}
