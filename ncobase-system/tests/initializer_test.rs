use std::sync::Arc;

use async_trait::async_trait;

use ncobase_api_types::{RelationKind, StepOutcome};
use ncobase_config::SystemConfig;
use ncobase_interfaces::RepositoryFactory;
use ncobase_storage::entities::{casbin_rules, users, CasbinRules, Permissions, RolePermissions, Roles, UserGroups, Users};
use ncobase_storage::sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use ncobase_storage::testing::TestDatabase;
use ncobase_system::{default_steps, Initializer, SeedContext, SeedStep, StepError, SystemError};

fn context(db: &TestDatabase) -> SeedContext {
    let repositories: Arc<dyn RepositoryFactory> = Arc::new(db.factory());
    SeedContext::new(db.connection.clone(), repositories, SystemConfig::default()).with_hash_cost(4)
}

fn initializer(db: &TestDatabase) -> Initializer {
    Initializer::from_context(context(db))
}

struct BrokenStep;

#[async_trait]
impl SeedStep for BrokenStep {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn is_seeded(&self, _ctx: &SeedContext) -> Result<bool, StepError> {
        Ok(false)
    }

    async fn seed(&self, _ctx: &SeedContext) -> Result<(), StepError> {
        Err(StepError::missing("nothing to seed"))
    }
}

#[tokio::test]
async fn test_first_run_executes_every_step() {
    let db = TestDatabase::new().await.unwrap();
    let init = initializer(&db);

    let report = init.execute(false).await.unwrap();
    assert_eq!(report.steps.len(), 7);
    assert!(report.steps.iter().all(|s| s.outcome == StepOutcome::Executed));
    assert_eq!(report.executed_steps().count(), 7);

    let conn = db.connection.get_connection();
    assert_eq!(Roles::find().count(conn).await.unwrap(), 3);
    assert_eq!(Permissions::find().count(conn).await.unwrap(), 19);
    assert_eq!(Users::find().count(conn).await.unwrap(), 3);
    assert_eq!(UserGroups::find().count(conn).await.unwrap(), 1);

    let status = init.status().await.unwrap();
    assert!(status.initialized);
    assert!(status.initialized_at.is_some());
}

#[tokio::test]
async fn test_second_run_is_rejected_without_flag() {
    let db = TestDatabase::new().await.unwrap();
    let init = initializer(&db);
    init.execute(false).await.unwrap();

    let err = init.execute(false).await.unwrap_err();
    assert!(matches!(err, SystemError::AlreadyInitialized));
    assert_eq!(Roles::find().count(db.connection.get_connection()).await.unwrap(), 3);
}

#[tokio::test]
async fn test_reinitialization_skips_seeded_steps() {
    let db = TestDatabase::new().await.unwrap();
    let init = initializer(&db);
    init.execute(false).await.unwrap();

    let report = init.execute(true).await.unwrap();
    assert!(report.steps.iter().all(|s| s.outcome == StepOutcome::Skipped));
    assert_eq!(report.executed_steps().count(), 0);

    let conn = db.connection.get_connection();
    assert_eq!(Roles::find().count(conn).await.unwrap(), 3);
    assert_eq!(Users::find().count(conn).await.unwrap(), 3);
}

#[tokio::test]
async fn test_status_before_any_run() {
    let db = TestDatabase::new().await.unwrap();
    let status = initializer(&db).status().await.unwrap();
    assert!(!status.initialized);
    assert_eq!(status.initialized_at, None);
}

#[tokio::test]
async fn test_users_join_default_tenant_with_roles() {
    let db = TestDatabase::new().await.unwrap();
    initializer(&db).execute(false).await.unwrap();
    let repos = db.factory();

    let tenant = repos.tenant_repository().find_by_slug("ncobase").await.unwrap().unwrap();
    let admin = Users::find()
        .filter(users::Column::Username.eq("admin"))
        .one(db.connection.get_connection())
        .await
        .unwrap()
        .unwrap();
    assert!(admin.is_admin);
    assert!(bcrypt::verify("Ac123456", &admin.password_hash).unwrap());

    assert!(repos.user_tenant_repository().is_member(&admin.id, &tenant.id).await.unwrap());
    let default = repos.tenant_repository().find_by_user(&admin.id).await.unwrap().unwrap();
    assert_eq!(default.id, tenant.id);

    let role_ids = repos.user_tenant_role_repository().role_ids(&admin.id, &tenant.id).await.unwrap();
    assert_eq!(role_ids.len(), 1);
    let role = Roles::find_by_id(role_ids[0].clone())
        .one(db.connection.get_connection())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(role.slug, "admin");

    assert_eq!(repos.relation_repository(RelationKind::Menu).target_ids_by_tenant(&tenant.id).await.unwrap().len(), 5);
    assert_eq!(repos.relation_repository(RelationKind::Group).target_ids_by_tenant(&tenant.id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_policies_follow_role_grants() {
    let db = TestDatabase::new().await.unwrap();
    initializer(&db).execute(false).await.unwrap();
    let conn = db.connection.get_connection();

    let grants = RolePermissions::find().count(conn).await.unwrap();
    let policies = CasbinRules::find()
        .filter(casbin_rules::Column::PType.eq("p"))
        .count(conn)
        .await
        .unwrap();
    let bindings = CasbinRules::find()
        .filter(casbin_rules::Column::PType.eq("g"))
        .count(conn)
        .await
        .unwrap();
    // super-admin 19, admin 18, user 6
    assert_eq!(grants, 43);
    assert_eq!(policies, grants);
    assert_eq!(bindings, 3);

    let system_manage = CasbinRules::find()
        .filter(casbin_rules::Column::PType.eq("p"))
        .filter(casbin_rules::Column::V2.eq("system"))
        .all(conn)
        .await
        .unwrap();
    assert_eq!(system_manage.len(), 1);
    assert_eq!(system_manage[0].v0, "super-admin");
}

#[tokio::test]
async fn test_failed_step_keeps_earlier_work_and_no_marker() {
    let db = TestDatabase::new().await.unwrap();
    let mut steps = default_steps();
    steps.truncate(1);
    steps.push(Box::new(BrokenStep));
    let init = Initializer::with_steps(context(&db), steps);

    let err = init.execute(false).await.unwrap_err();
    match err {
        SystemError::Step { step, source } => {
            assert_eq!(step, "broken");
            assert!(matches!(source, StepError::MissingPrerequisite(_)));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(Roles::find().count(db.connection.get_connection()).await.unwrap(), 3);
    assert!(!init.status().await.unwrap().initialized);

    // a full run afterwards picks up where the broken one stopped
    let report = initializer(&db).execute(false).await.unwrap();
    assert_eq!(report.steps[0].outcome, StepOutcome::Skipped);
    assert_eq!(report.executed_steps().count(), 6);
}

#[tokio::test]
async fn test_users_step_requires_default_tenant() {
    let db = TestDatabase::new().await.unwrap();
    let steps = default_steps()
        .into_iter()
        .filter(|s| s.name() != "tenants")
        .collect();
    let init = Initializer::with_steps(context(&db), steps);

    let err = init.execute(false).await.unwrap_err();
    assert!(matches!(err, SystemError::Step { step: "users", .. }));
}
