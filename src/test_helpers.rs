//! Fixtures for unit tests: an in-memory database and seeded accounts.

use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use crate::migrations::Migrator;
use crate::models::account::{self, AccountRole};
use crate::services::security::hash_password;

/// Create a migrated in-memory SQLite database.
///
/// A single pooled connection, since every in-memory connection is its own
/// database.
pub async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Insert an active account with a bcrypt-hashed password
pub async fn create_test_account(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    role: AccountRole,
) -> account::Model {
    let now = chrono::Utc::now();

    let new_account = account::ActiveModel {
        email: Set(email.to_string()),
        name: Set(email.split('@').next().unwrap_or(email).to_string()),
        company_name: Set(None),
        hashed_password: Set(hash_password(password).unwrap()),
        role: Set(role),
        is_active: Set(true),
        application_id: Set(None),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_account.insert(db).await.unwrap()
}
