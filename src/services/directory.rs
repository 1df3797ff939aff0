//! Account directory: answers "does an active partner account exist for this
//! email?" during intake.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use crate::db::DbConn;
use crate::models::account::{self, AccountRole};
use crate::models::prelude::*;

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// `email` is already normalised (trimmed, lowercased)
    async fn partner_exists(&self, email: &str) -> Result<bool, DbErr>;
}

/// Directory backed by the local `accounts` table
#[derive(Clone)]
pub struct DbAccountDirectory {
    db: DbConn,
}

impl DbAccountDirectory {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountDirectory for DbAccountDirectory {
    async fn partner_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = Account::find()
            .filter(account::Column::Email.eq(email))
            .filter(account::Column::Role.eq(AccountRole::Partner))
            .filter(account::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
