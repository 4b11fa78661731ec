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
                        .table(Roles::Table)
                        .if_not_exists()
                        .col(id_column(Roles::Id))
                        .col(ColumnDef::new(Roles::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Roles::Slug).string_len(64).not_null().unique_key())
                        .col(ColumnDef::new(Roles::Disabled).boolean().not_null().default(false))
                        .col(ColumnDef::new(Roles::Description).string_len(500).null())
                        .col(ColumnDef::new(Roles::Extras).json().not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(Permissions::Table)
                        .if_not_exists()
                        .col(id_column(Permissions::Id))
                        .col(ColumnDef::new(Permissions::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Permissions::Action).string_len(50).not_null())
                        .col(ColumnDef::new(Permissions::Subject).string_len(50).not_null())
                        .col(ColumnDef::new(Permissions::Description).string_len(500).null())
                        .col(ColumnDef::new(Permissions::IsDefault).boolean().not_null().default(false))
                        .col(ColumnDef::new(Permissions::Disabled).boolean().not_null().default(false))
                        .col(ColumnDef::new(Permissions::Extras).json().not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_permissions_subject_action")
                    .table(Permissions::Table)
                    .col(Permissions::Subject)
                    .col(Permissions::Action)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(RolePermissions::Table)
                        .if_not_exists()
                        .col(id_column(RolePermissions::Id))
                        .col(ColumnDef::new(RolePermissions::RoleId).string_len(36).not_null())
                        .col(ColumnDef::new(RolePermissions::PermissionId).string_len(36).not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_role_permissions_pair")
                    .table(RolePermissions::Table)
                    .col(RolePermissions::RoleId)
                    .col(RolePermissions::PermissionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(id_column(Users::Id))
                        .col(ColumnDef::new(Users::Username).string_len(50).not_null().unique_key())
                        .col(ColumnDef::new(Users::Email).string_len(255).not_null().unique_key())
                        .col(ColumnDef::new(Users::Phone).string_len(32).null())
                        .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                        .col(ColumnDef::new(Users::IsAdmin).boolean().not_null().default(false))
                        .col(ColumnDef::new(Users::IsCertified).boolean().not_null().default(false))
                        .col(ColumnDef::new(Users::Disabled).boolean().not_null().default(false))
                        .col(ColumnDef::new(Users::Extras).json().not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(Menus::Table)
                        .if_not_exists()
                        .col(id_column(Menus::Id))
                        .col(ColumnDef::new(Menus::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Menus::Label).string_len(100).not_null())
                        .col(ColumnDef::new(Menus::Slug).string_len(64).not_null().unique_key())
                        .col(ColumnDef::new(Menus::MenuType).string_len(20).not_null())
                        .col(ColumnDef::new(Menus::Path).string_len(255).not_null())
                        .col(ColumnDef::new(Menus::Icon).string_len(64).null())
                        .col(ColumnDef::new(Menus::Perms).string_len(100).null())
                        .col(ColumnDef::new(Menus::ParentId).string_len(36).null())
                        .col(ColumnDef::new(Menus::SortOrder).integer().not_null().default(0))
                        .col(ColumnDef::new(Menus::Hidden).boolean().not_null().default(false))
                        .col(ColumnDef::new(Menus::Disabled).boolean().not_null().default(false))
                        .col(ColumnDef::new(Menus::Extras).json().not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(Groups::Table)
                        .if_not_exists()
                        .col(id_column(Groups::Id))
                        .col(ColumnDef::new(Groups::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Groups::Slug).string_len(64).not_null().unique_key())
                        .col(ColumnDef::new(Groups::Disabled).boolean().not_null().default(false))
                        .col(ColumnDef::new(Groups::Description).string_len(500).null())
                        .col(ColumnDef::new(Groups::LeaderId).string_len(36).null())
                        .col(ColumnDef::new(Groups::ParentId).string_len(36).null())
                        .col(ColumnDef::new(Groups::Extras).json().not_null()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                with_audit_columns(
                    Table::create()
                        .table(UserGroups::Table)
                        .if_not_exists()
                        .col(id_column(UserGroups::Id))
                        .col(ColumnDef::new(UserGroups::UserId).string_len(36).not_null())
                        .col(ColumnDef::new(UserGroups::GroupId).string_len(36).not_null())
                        .col(ColumnDef::new(UserGroups::Role).string_len(20).not_null().default("member")),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_user_groups_pair")
                    .table(UserGroups::Table)
                    .col(UserGroups::UserId)
                    .col(UserGroups::GroupId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CasbinRules::Table)
                    .if_not_exists()
                    .col(id_column(CasbinRules::Id))
                    .col(ColumnDef::new(CasbinRules::PType).string_len(8).not_null())
                    .col(ColumnDef::new(CasbinRules::V0).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(CasbinRules::V1).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(CasbinRules::V2).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(CasbinRules::V3).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(CasbinRules::V4).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(CasbinRules::V5).string_len(255).not_null().default(""))
                    .col(
                        ColumnDef::new(CasbinRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_casbin_rules_ptype_v0")
                    .table(CasbinRules::Table)
                    .col(CasbinRules::PType)
                    .col(CasbinRules::V0)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SystemStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemStates::Key)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SystemStates::Value).json().not_null())
                    .col(
                        ColumnDef::new(SystemStates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SystemStates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            SystemStates::Table.into_iden(),
            CasbinRules::Table.into_iden(),
            UserGroups::Table.into_iden(),
            Groups::Table.into_iden(),
            Menus::Table.into_iden(),
            Users::Table.into_iden(),
            RolePermissions::Table.into_iden(),
            Permissions::Table.into_iden(),
            Roles::Table.into_iden(),
        ] {
            manager.drop_table(Table::drop().table(table).to_owned()).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
    Slug,
    Disabled,
    Description,
    Extras,
}

#[derive(DeriveIden)]
enum Permissions {
    Table,
    Id,
    Name,
    Action,
    Subject,
    Description,
    IsDefault,
    Disabled,
    Extras,
}

#[derive(DeriveIden)]
enum RolePermissions {
    Table,
    Id,
    RoleId,
    PermissionId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    Phone,
    PasswordHash,
    IsAdmin,
    IsCertified,
    Disabled,
    Extras,
}

#[derive(DeriveIden)]
enum Menus {
    Table,
    Id,
    Name,
    Label,
    Slug,
    MenuType,
    Path,
    Icon,
    Perms,
    ParentId,
    SortOrder,
    Hidden,
    Disabled,
    Extras,
}

#[derive(DeriveIden)]
enum Groups {
    Table,
    Id,
    Name,
    Slug,
    Disabled,
    Description,
    LeaderId,
    ParentId,
    Extras,
}

#[derive(DeriveIden)]
enum UserGroups {
    Table,
    Id,
    UserId,
    GroupId,
    Role,
}

#[derive(DeriveIden)]
enum CasbinRules {
    Table,
    Id,
    PType,
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SystemStates {
    Table,
    Key,
    Value,
    CreatedAt,
    UpdatedAt,
}
