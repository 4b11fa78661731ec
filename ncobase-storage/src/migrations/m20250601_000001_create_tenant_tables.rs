use sea_orm_migration::prelude::*;

use super::{id_column, with_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(Tenants::Table)
                        .if_not_exists()
                        .col(id_column(Tenants::Id))
                        .col(ColumnDef::new(Tenants::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Tenants::Slug).string_len(64).not_null().unique_key())
                        .col(
                            ColumnDef::new(Tenants::TenantType)
                                .string_len(50)
                                .not_null()
                                .default("private"),
                        )
                        .col(ColumnDef::new(Tenants::Title).string_len(255).null())
                        .col(ColumnDef::new(Tenants::Url).string_len(255).null())
                        .col(ColumnDef::new(Tenants::Logo).string_len(255).null())
                        .col(ColumnDef::new(Tenants::LogoAlt).string_len(255).null())
                        .col(ColumnDef::new(Tenants::Keywords).json().not_null())
                        .col(ColumnDef::new(Tenants::Copyright).string_len(255).null())
                        .col(ColumnDef::new(Tenants::Description).text().null())
                        .col(ColumnDef::new(Tenants::Disabled).boolean().not_null().default(false))
                        .col(ColumnDef::new(Tenants::Extras).json().not_null())
                        .col(ColumnDef::new(Tenants::ExpiredAt).timestamp_with_time_zone().null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(TenantQuotas::Table)
                        .if_not_exists()
                        .col(id_column(TenantQuotas::Id))
                        .col(ColumnDef::new(TenantQuotas::TenantId).string_len(36).not_null())
                        .col(ColumnDef::new(TenantQuotas::QuotaType).string_len(20).not_null())
                        .col(ColumnDef::new(TenantQuotas::QuotaName).string_len(100).not_null())
                        .col(ColumnDef::new(TenantQuotas::MaxValue).big_integer().not_null())
                        .col(
                            ColumnDef::new(TenantQuotas::CurrentUsed)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(TenantQuotas::Unit).string_len(20).not_null())
                        .col(ColumnDef::new(TenantQuotas::Description).string_len(500).null())
                        .col(ColumnDef::new(TenantQuotas::Enabled).boolean().not_null().default(true))
                        .col(ColumnDef::new(TenantQuotas::Extras).json().not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_tenant_quotas_tenant_type")
                    .table(TenantQuotas::Table)
                    .col(TenantQuotas::TenantId)
                    .col(TenantQuotas::QuotaType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(TenantBillings::Table)
                        .if_not_exists()
                        .col(id_column(TenantBillings::Id))
                        .col(ColumnDef::new(TenantBillings::TenantId).string_len(36).not_null())
                        .col(ColumnDef::new(TenantBillings::BillingPeriod).string_len(20).not_null())
                        .col(ColumnDef::new(TenantBillings::PeriodStart).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(TenantBillings::PeriodEnd).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(TenantBillings::Amount).double().not_null().default(0.0))
                        .col(
                            ColumnDef::new(TenantBillings::Currency)
                                .string_len(3)
                                .not_null()
                                .default("USD"),
                        )
                        .col(ColumnDef::new(TenantBillings::Status).string_len(20).not_null())
                        .col(
                            ColumnDef::new(TenantBillings::InvoiceNumber)
                                .string_len(64)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(TenantBillings::Description).string_len(500).null())
                        .col(ColumnDef::new(TenantBillings::DueDate).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(TenantBillings::PaidAt).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(TenantBillings::PaymentMethod).string_len(50).null())
                        .col(ColumnDef::new(TenantBillings::UsageDetails).json().not_null())
                        .col(ColumnDef::new(TenantBillings::Extras).json().not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tenant_billings_tenant_id")
                    .table(TenantBillings::Table)
                    .col(TenantBillings::TenantId)
                    .to_owned(),
            )
            .await?;

        // the overdue sweep filters on both columns
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tenant_billings_status_due_date")
                    .table(TenantBillings::Table)
                    .col(TenantBillings::Status)
                    .col(TenantBillings::DueDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(TenantSettings::Table)
                        .if_not_exists()
                        .col(id_column(TenantSettings::Id))
                        .col(ColumnDef::new(TenantSettings::TenantId).string_len(36).not_null())
                        .col(ColumnDef::new(TenantSettings::SettingKey).string_len(100).not_null())
                        .col(ColumnDef::new(TenantSettings::SettingName).string_len(100).not_null())
                        .col(ColumnDef::new(TenantSettings::SettingValue).text().not_null())
                        .col(ColumnDef::new(TenantSettings::DefaultValue).text().null())
                        .col(ColumnDef::new(TenantSettings::SettingType).string_len(20).not_null())
                        .col(ColumnDef::new(TenantSettings::Scope).string_len(20).not_null())
                        .col(
                            ColumnDef::new(TenantSettings::Category)
                                .string_len(50)
                                .not_null()
                                .default("general"),
                        )
                        .col(ColumnDef::new(TenantSettings::Description).string_len(500).null())
                        .col(ColumnDef::new(TenantSettings::Validation).json().null())
                        .col(ColumnDef::new(TenantSettings::SortOrder).integer().not_null().default(0))
                        .col(ColumnDef::new(TenantSettings::IsPublic).boolean().not_null().default(false))
                        .col(ColumnDef::new(TenantSettings::IsRequired).boolean().not_null().default(false))
                        .col(ColumnDef::new(TenantSettings::IsReadonly).boolean().not_null().default(false))
                        .col(ColumnDef::new(TenantSettings::Extras).json().not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_tenant_settings_tenant_key")
                    .table(TenantSettings::Table)
                    .col(TenantSettings::TenantId)
                    .col(TenantSettings::SettingKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TenantSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TenantBillings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TenantQuotas::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Tenants::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    Name,
    Slug,
    TenantType,
    Title,
    Url,
    Logo,
    LogoAlt,
    Keywords,
    Copyright,
    Description,
    Disabled,
    Extras,
    ExpiredAt,
}

#[derive(DeriveIden)]
enum TenantQuotas {
    Table,
    Id,
    TenantId,
    QuotaType,
    QuotaName,
    MaxValue,
    CurrentUsed,
    Unit,
    Description,
    Enabled,
    Extras,
}

#[derive(DeriveIden)]
enum TenantBillings {
    Table,
    Id,
    TenantId,
    BillingPeriod,
    PeriodStart,
    PeriodEnd,
    Amount,
    Currency,
    Status,
    InvoiceNumber,
    Description,
    DueDate,
    PaidAt,
    PaymentMethod,
    UsageDetails,
    Extras,
}

#[derive(DeriveIden)]
enum TenantSettings {
    Table,
    Id,
    TenantId,
    SettingKey,
    SettingName,
    SettingValue,
    DefaultValue,
    SettingType,
    Scope,
    Category,
    Description,
    Validation,
    SortOrder,
    IsPublic,
    IsRequired,
    IsReadonly,
    Extras,
}
