//! Record store for partner applications.
//!
//! Every status or invite mutation is a conditional `UPDATE` whose `WHERE`
//! clause restates the precondition, so two concurrent requests cannot both
//! win. Callers inspect the returned flag instead of re-reading first.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use serde::Serialize;

use crate::db::DbConn;
use crate::models::partner_application::{self, ApplicationStatus};
use crate::models::prelude::*;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Validated, normalised applicant data ready to persist
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company_name: Option<String>,
    pub description: String,
}

/// Fields written when an application leaves `pending`
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub reviewed_by: String,
    /// `None` keeps the existing notes
    pub admin_notes: Option<String>,
    pub invite_code: Option<String>,
    pub code_expires_at: Option<DateTime<Utc>>,
}

/// Admin list filter. `page` is 1-based.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ApplicationPage {
    pub items: Vec<partner_application::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

#[derive(Clone)]
pub struct ApplicationStore {
    db: DbConn,
}

impl ApplicationStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DbConn {
        &self.db
    }

    /// Insert a new `pending` application. Fails with a unique-constraint
    /// error if the email already has a pending or approved application.
    pub async fn insert_pending(
        &self,
        new: NewApplication,
    ) -> Result<partner_application::Model, DbErr> {
        let now = Utc::now();

        let record = partner_application::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(new.name),
            email: Set(new.email),
            phone: Set(new.phone),
            company_name: Set(new.company_name),
            description: Set(new.description),
            status: Set(ApplicationStatus::Pending),
            invite_code: Set(None),
            code_expires_at: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            admin_notes: Set(None),
            redeemed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<partner_application::Model>, DbErr> {
        PartnerApplication::find_by_id(id.to_string()).one(&self.db).await
    }

    /// The pending or approved application for an email, if any
    pub async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<partner_application::Model>, DbErr> {
        PartnerApplication::find()
            .filter(partner_application::Column::Email.eq(email))
            .filter(partner_application::Column::Status.is_in(ApplicationStatus::active()))
            .one(&self.db)
            .await
    }

    /// Move an application out of `pending`. Returns `false` when the row no
    /// longer exists or is not pending any more.
    pub async fn transition_from_pending(
        &self,
        id: &str,
        change: &StatusChange,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let mut update = partner_application::ActiveModel {
            status: Set(change.status),
            invite_code: Set(change.invite_code.clone()),
            code_expires_at: Set(change.code_expires_at),
            reviewed_by: Set(Some(change.reviewed_by.clone())),
            reviewed_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(notes) = &change.admin_notes {
            update.admin_notes = Set(Some(notes.clone()));
        }

        let result = PartnerApplication::update_many()
            .set(update)
            .filter(partner_application::Column::Id.eq(id))
            .filter(partner_application::Column::Status.eq(ApplicationStatus::Pending))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// The approved, unredeemed, unexpired application matching an email and
    /// invite code
    pub async fn find_redeemable(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<partner_application::Model>, DbErr> {
        PartnerApplication::find()
            .filter(redeemable_condition(email, code, now))
            .one(&self.db)
            .await
    }

    /// Clear the invite code and stamp `redeemed_at`, only if the code is
    /// still redeemable. Runs on the given connection so it can share a
    /// transaction with account creation.
    pub async fn consume_invite_in<C: ConnectionTrait>(
        conn: &C,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let update = partner_application::ActiveModel {
            invite_code: Set(None),
            redeemed_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = PartnerApplication::update_many()
            .set(update)
            .filter(redeemable_condition(email, code, now))
            .exec(conn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Replace the admin notes; status is untouched
    pub async fn update_notes(
        &self,
        id: &str,
        notes: Option<String>,
    ) -> Result<Option<partner_application::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut record: partner_application::ActiveModel = existing.into();
        record.admin_notes = Set(notes);
        record.updated_at = Set(Utc::now());
        record.update(&self.db).await.map(Some)
    }

    /// Newest-first page of applications
    pub async fn list(&self, filter: &ApplicationFilter) -> Result<ApplicationPage, DbErr> {
        let per_page = filter
            .per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = filter.page.unwrap_or(1).max(1);

        let mut query = PartnerApplication::find();
        if let Some(status) = filter.status {
            query = query.filter(partner_application::Column::Status.eq(status));
        }
        if let Some(search) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            query = query.filter(
                Condition::any()
                    .add(contains_literal(partner_application::Column::Name, search))
                    .add(contains_literal(
                        partner_application::Column::Email,
                        &search.to_lowercase(),
                    ))
                    .add(contains_literal(partner_application::Column::CompanyName, search)),
            );
        }

        let paginator = query
            .order_by_desc(partner_application::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok(ApplicationPage {
            items,
            total,
            page,
            per_page,
        })
    }

    pub async fn count_by_status(&self) -> Result<StatusCounts, DbErr> {
        let count = |status: ApplicationStatus| {
            PartnerApplication::find()
                .filter(partner_application::Column::Status.eq(status))
                .count(&self.db)
        };

        Ok(StatusCounts {
            pending: count(ApplicationStatus::Pending).await?,
            approved: count(ApplicationStatus::Approved).await?,
            rejected: count(ApplicationStatus::Rejected).await?,
        })
    }
}

fn redeemable_condition(email: &str, code: &str, now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(partner_application::Column::Email.eq(email))
        .add(partner_application::Column::Status.eq(ApplicationStatus::Approved))
        .add(partner_application::Column::InviteCode.eq(code))
        .add(partner_application::Column::RedeemedAt.is_null())
        .add(partner_application::Column::CodeExpiresAt.gt(now))
}

const LIKE_ESCAPE: char = '\\';

/// `LIKE '%term%'` with `%`, `_` and the escape character matched literally
fn contains_literal(column: partner_application::Column, term: &str) -> SimpleExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');

    column.like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
