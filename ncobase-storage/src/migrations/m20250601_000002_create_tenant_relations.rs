use sea_orm_migration::prelude::*;

use super::{id_column, with_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (table, target column, unique index name, reverse index name)
const TENANT_LINKS: [(&str, &str, &str, &str); 4] = [
    ("tenant_groups", "group_id", "uk_tenant_groups_pair", "idx_tenant_groups_group_id"),
    ("tenant_menus", "menu_id", "uk_tenant_menus_pair", "idx_tenant_menus_menu_id"),
    (
        "tenant_dictionaries",
        "dictionary_id",
        "uk_tenant_dictionaries_pair",
        "idx_tenant_dictionaries_dictionary_id",
    ),
    ("tenant_options", "option_id", "uk_tenant_options_pair", "idx_tenant_options_option_id"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, target, unique_name, reverse_name) in TENANT_LINKS {
            manager
                .create_table(
                    with_audit_columns(
                        Table::create()
                            .table(Alias::new(table))
                            .if_not_exists()
                            .col(id_column(Alias::new("id")))
                            .col(ColumnDef::new(Alias::new("tenant_id")).string_len(36).not_null())
                            .col(ColumnDef::new(Alias::new(target)).string_len(36).not_null()),
                    )
                    .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(unique_name)
                        .table(Alias::new(table))
                        .col(Alias::new("tenant_id"))
                        .col(Alias::new(target))
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(reverse_name)
                        .table(Alias::new(table))
                        .col(Alias::new(target))
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(UserTenants::Table)
                        .if_not_exists()
                        .col(id_column(UserTenants::Id))
                        .col(ColumnDef::new(UserTenants::UserId).string_len(36).not_null())
                        .col(ColumnDef::new(UserTenants::TenantId).string_len(36).not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_user_tenants_pair")
                    .table(UserTenants::Table)
                    .col(UserTenants::UserId)
                    .col(UserTenants::TenantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_tenants_tenant_id")
                    .table(UserTenants::Table)
                    .col(UserTenants::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(UserTenantRoles::Table)
                        .if_not_exists()
                        .col(id_column(UserTenantRoles::Id))
                        .col(ColumnDef::new(UserTenantRoles::UserId).string_len(36).not_null())
                        .col(ColumnDef::new(UserTenantRoles::TenantId).string_len(36).not_null())
                        .col(ColumnDef::new(UserTenantRoles::RoleId).string_len(36).not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_user_tenant_roles_triple")
                    .table(UserTenantRoles::Table)
                    .col(UserTenantRoles::UserId)
                    .col(UserTenantRoles::TenantId)
                    .col(UserTenantRoles::RoleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_tenant_roles_tenant_role")
                    .table(UserTenantRoles::Table)
                    .col(UserTenantRoles::TenantId)
                    .col(UserTenantRoles::RoleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserTenantRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserTenants::Table).to_owned())
            .await?;
        for (table, ..) in TENANT_LINKS {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum UserTenants {
    Table,
    Id,
    UserId,
    TenantId,
}

#[derive(DeriveIden)]
enum UserTenantRoles {
    Table,
    Id,
    UserId,
    TenantId,
    RoleId,
}
