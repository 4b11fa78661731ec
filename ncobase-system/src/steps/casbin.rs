use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use ncobase_api_types::new_id;
use ncobase_storage::entities::{
    casbin_rules, user_tenant_roles, CasbinRules, Permissions, RolePermissions, UserTenantRoles,
};
use ncobase_storage::sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use super::SeedStep;
use crate::context::SeedContext;
use crate::error::StepError;

fn rule(p_type: &str, values: [&str; 4]) -> casbin_rules::ActiveModel {
    let [v0, v1, v2, v3] = values;
    casbin_rules::ActiveModel {
        id: Set(new_id()),
        p_type: Set(p_type.to_string()),
        v0: Set(v0.to_string()),
        v1: Set(v1.to_string()),
        v2: Set(v2.to_string()),
        v3: Set(v3.to_string()),
        v4: Set(String::new()),
        v5: Set(String::new()),
        created_at: Set(Utc::now()),
    }
}

/// Policy rows in the domain RBAC layout:
/// `p, role, tenant, subject, action` and `g, user, role, tenant`
pub struct CasbinPoliciesStep;

#[async_trait]
impl SeedStep for CasbinPoliciesStep {
    fn name(&self) -> &'static str {
        "casbin_policies"
    }

    async fn is_seeded(&self, ctx: &SeedContext) -> Result<bool, StepError> {
        Ok(CasbinRules::find().count(ctx.connection()).await? > 0)
    }

    async fn seed(&self, ctx: &SeedContext) -> Result<(), StepError> {
        let tenant = ctx.default_tenant().await?;
        let role_slugs = ctx.role_slugs().await?;
        let permissions: HashMap<String, (String, String)> = Permissions::find()
            .all(ctx.connection())
            .await?
            .into_iter()
            .map(|p| (p.id, (p.subject, p.action)))
            .collect();

        let mut rules = Vec::new();
        for grant in RolePermissions::find().all(ctx.connection()).await? {
            let (Some(role), Some((subject, action))) =
                (role_slugs.get(&grant.role_id), permissions.get(&grant.permission_id))
            else {
                continue;
            };
            rules.push(rule("p", [role, &tenant.id, subject, action]));
        }
        let policy_count = rules.len();

        let assignments = UserTenantRoles::find()
            .filter(user_tenant_roles::Column::TenantId.eq(tenant.id.as_str()))
            .all(ctx.connection())
            .await?;
        for assignment in assignments {
            if let Some(role) = role_slugs.get(&assignment.role_id) {
                rules.push(rule("g", [&assignment.user_id, role, &tenant.id, ""]));
            }
        }

        if rules.is_empty() {
            return Err(StepError::missing("role grants"));
        }
        let total = rules.len();
        CasbinRules::insert_many(rules)
            .exec_without_returning(ctx.connection())
            .await?;

        info!(
            "Seeded {} policies and {} role bindings for tenant {}",
            policy_count,
            total - policy_count,
            tenant.slug
        );
        Ok(())
    }
}
