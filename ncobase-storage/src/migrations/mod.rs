use sea_orm_migration::prelude::*;

mod m20250601_000001_create_tenant_tables;
mod m20250601_000002_create_tenant_relations;
mod m20250601_000003_create_system_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_tenant_tables::Migration),
            Box::new(m20250601_000002_create_tenant_relations::Migration),
            Box::new(m20250601_000003_create_system_tables::Migration),
        ]
    }
}

/// String primary key column holding a UUID v7
pub(crate) fn id_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).string_len(36).not_null().primary_key().to_owned()
}

/// `created_by`, `updated_by`, `created_at`, `updated_at`
pub(crate) fn with_audit_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(ColumnDef::new(Alias::new("created_by")).string_len(36).null())
        .col(ColumnDef::new(Alias::new("updated_by")).string_len(36).null())
        .col(
            ColumnDef::new(Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Alias::new("updated_at"))
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
}
