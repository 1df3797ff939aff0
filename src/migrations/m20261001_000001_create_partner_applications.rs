//! Migration: Create partner_applications table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// At most one pending or approved application per email. Intake checks this
/// up front; the index closes the window between two concurrent submissions.
const ACTIVE_EMAIL_INDEX_SQL: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
    idx_partner_applications_active_email ON partner_applications (email) \
    WHERE status IN ('pending', 'approved')";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PartnerApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PartnerApplications::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PartnerApplications::Name).string().not_null())
                    .col(ColumnDef::new(PartnerApplications::Email).string().not_null())
                    .col(ColumnDef::new(PartnerApplications::Phone).string().not_null())
                    .col(ColumnDef::new(PartnerApplications::CompanyName).string().null())
                    .col(
                        ColumnDef::new(PartnerApplications::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerApplications::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(PartnerApplications::InviteCode).string().null())
                    .col(
                        ColumnDef::new(PartnerApplications::CodeExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(PartnerApplications::ReviewedBy).string().null())
                    .col(
                        ColumnDef::new(PartnerApplications::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(PartnerApplications::AdminNotes).text().null())
                    .col(
                        ColumnDef::new(PartnerApplications::RedeemedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PartnerApplications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerApplications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partner_applications_status")
                    .table(PartnerApplications::Table)
                    .col(PartnerApplications::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partner_applications_created_at")
                    .table(PartnerApplications::Table)
                    .col(PartnerApplications::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(ACTIVE_EMAIL_INDEX_SQL)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(PartnerApplications::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum PartnerApplications {
    Table,
    Id,
    Name,
    Email,
    Phone,
    #[iden = "company_name"]
    CompanyName,
    Description,
    Status,
    #[iden = "invite_code"]
    InviteCode,
    #[iden = "code_expires_at"]
    CodeExpiresAt,
    #[iden = "reviewed_by"]
    ReviewedBy,
    #[iden = "reviewed_at"]
    ReviewedAt,
    #[iden = "admin_notes"]
    AdminNotes,
    #[iden = "redeemed_at"]
    RedeemedAt,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
