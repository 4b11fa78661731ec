use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;

use ncobase_api_types::{
    new_id, BillingPeriod, BillingStatus, CursorInput, QuotaType, QuotaUnit, RelationKind, SettingScope,
    SettingType, Tenant, TenantBilling, TenantQuota, TenantRelation, TenantSetting, UserTenant, UserTenantRole,
};
use ncobase_interfaces::{BillingFilters, DatabaseError, RepositoryFactory, SettingFilters};

use crate::testing::TestDatabase;

fn tenant(slug: &str) -> Tenant {
    let now = Utc::now();
    Tenant {
        id: new_id(),
        name: slug.to_uppercase(),
        slug: slug.to_string(),
        tenant_type: "private".to_string(),
        title: None,
        url: None,
        logo: None,
        logo_alt: None,
        keywords: vec!["saas".to_string()],
        copyright: None,
        description: None,
        disabled: false,
        extras: json!({}),
        expired_at: None,
        created_by: Some("tester".to_string()),
        updated_by: Some("tester".to_string()),
        created_at: now,
        updated_at: now,
    }
}

fn quota(tenant_id: &str, quota_type: QuotaType, max_value: i64, current_used: i64) -> TenantQuota {
    let now = Utc::now();
    TenantQuota {
        id: new_id(),
        tenant_id: tenant_id.to_string(),
        quota_type,
        quota_name: quota_type.as_str().to_string(),
        max_value,
        current_used,
        unit: QuotaUnit::Count,
        description: None,
        enabled: true,
        extras: json!({}),
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    }
}

fn billing(tenant_id: &str, status: BillingStatus, due_in_days: i64) -> TenantBilling {
    let now = Utc::now();
    TenantBilling {
        id: new_id(),
        tenant_id: tenant_id.to_string(),
        billing_period: BillingPeriod::Monthly,
        period_start: None,
        period_end: None,
        amount: 99.0,
        currency: "USD".to_string(),
        status,
        invoice_number: format!("INV-TEST-{}", new_id()),
        description: None,
        due_date: Some(now + Duration::days(due_in_days)),
        paid_at: None,
        payment_method: None,
        usage_details: json!({}),
        extras: json!({}),
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    }
}

fn setting(tenant_id: &str, key: &str, value: &str) -> TenantSetting {
    let now = Utc::now();
    TenantSetting {
        id: new_id(),
        tenant_id: tenant_id.to_string(),
        setting_key: key.to_string(),
        setting_name: key.to_string(),
        setting_value: value.to_string(),
        default_value: None,
        setting_type: SettingType::String,
        scope: SettingScope::Tenant,
        category: "general".to_string(),
        description: None,
        validation: None,
        sort_order: 0,
        is_public: false,
        is_required: false,
        is_readonly: false,
        extras: json!({}),
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    }
}

fn link(kind: RelationKind, tenant_id: &str, target_id: &str) -> TenantRelation {
    let now = Utc::now();
    TenantRelation {
        id: new_id(),
        kind,
        tenant_id: tenant_id.to_string(),
        target_id: target_id.to_string(),
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    }
}

fn membership(user_id: &str, tenant_id: &str) -> UserTenant {
    let now = Utc::now();
    UserTenant {
        id: new_id(),
        user_id: user_id.to_string(),
        tenant_id: tenant_id.to_string(),
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    }
}

fn role_assignment(user_id: &str, tenant_id: &str, role_id: &str) -> UserTenantRole {
    let now = Utc::now();
    UserTenantRole {
        id: new_id(),
        user_id: user_id.to_string(),
        tenant_id: tenant_id.to_string(),
        role_id: role_id.to_string(),
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_tenant_cache_round_trip() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().tenant_repository();

    let created = repo.create(tenant("acme")).await.unwrap();
    let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "ACME");
    assert_eq!(by_id.created_by.as_deref(), Some("tester"));

    let by_slug = repo.find_by_slug("acme").await.unwrap().unwrap();
    assert_eq!(by_slug.id, created.id);
    assert_eq!(by_slug.keywords, vec!["saas".to_string()]);
}

#[tokio::test]
async fn test_tenant_update_invalidates_slug_mapping() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().tenant_repository();

    let created = repo.create(tenant("acme")).await.unwrap();
    repo.find_by_slug("acme").await.unwrap();

    let mut renamed = created.clone();
    renamed.slug = "acme-corp".to_string();
    renamed.name = "Acme Corp".to_string();
    let updated = repo.update(renamed).await.unwrap();
    assert_eq!(updated.created_at.timestamp(), created.created_at.timestamp());

    assert!(repo.find_by_slug("acme").await.unwrap().is_none());
    let fresh = repo.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(fresh.name, "Acme Corp");
}

#[tokio::test]
async fn test_tenant_delete_and_missing_update() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().tenant_repository();

    let created = repo.create(tenant("gone")).await.unwrap();
    repo.find_by_id(&created.id).await.unwrap();
    repo.delete(&created.id).await.unwrap();

    assert!(repo.find_by_id(&created.id).await.unwrap().is_none());
    assert!(repo.delete(&created.id).await.unwrap_err().is_not_found());
    assert!(repo.update(created).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_duplicate_slug_is_a_constraint_error() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().tenant_repository();

    repo.create(tenant("acme")).await.unwrap();
    let err = repo.create(tenant("acme")).await.unwrap_err();
    assert!(err.is_constraint(), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_tenant_list_walks_cursor_both_ways() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().tenant_repository();

    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(repo.create(tenant(&format!("tenant-{}", i))).await.unwrap().id);
    }

    let first = repo.list(CursorInput::first(2)).await.unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.items.iter().map(|t| t.id.clone()).collect::<Vec<_>>(), ids[0..2]);
    assert!(first.has_next_page);
    assert!(!first.has_prev_page);

    let second = repo
        .list(CursorInput::after(first.next_cursor.unwrap(), 2))
        .await
        .unwrap();
    assert_eq!(second.items.iter().map(|t| t.id.clone()).collect::<Vec<_>>(), ids[2..4]);
    assert!(second.has_prev_page);

    let back = repo
        .list(CursorInput::before(second.prev_cursor.unwrap(), 2))
        .await
        .unwrap();
    assert_eq!(back.items.iter().map(|t| t.id.clone()).collect::<Vec<_>>(), ids[0..2]);
    assert!(!back.has_prev_page);
}

#[tokio::test]
async fn test_find_by_user_uses_earliest_membership() {
    let db = TestDatabase::new().await.unwrap();
    let factory = db.factory();
    let tenants = factory.tenant_repository();
    let members = factory.user_tenant_repository();

    let first = tenants.create(tenant("first")).await.unwrap();
    let second = tenants.create(tenant("second")).await.unwrap();
    members.add(membership("u1", &first.id)).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    members.add(membership("u1", &second.id)).await.unwrap();

    let found = tenants.find_by_user("u1").await.unwrap().unwrap();
    assert_eq!(found.id, first.id);

    members.remove("u1", &first.id).await.unwrap();
    let found = tenants.find_by_user("u1").await.unwrap().unwrap();
    assert_eq!(found.id, second.id);

    assert!(tenants.find_by_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_usage_delta_creates_quota_with_default_limit() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().quota_repository();

    let created = repo
        .apply_usage_delta("t1", QuotaType::Storage, 1024, Some("u1"))
        .await
        .unwrap();
    assert_eq!(created.current_used, 1024);
    assert_eq!(created.max_value, 10 * 1024 * 1024 * 1024);
    assert_eq!(created.unit, QuotaUnit::Bytes);
    assert_eq!(created.created_by.as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_usage_delta_is_clamped_at_zero() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().quota_repository();

    repo.create(quota("t1", QuotaType::Users, 100, 10)).await.unwrap();
    let cached = repo.find_by_type("t1", QuotaType::Users).await.unwrap().unwrap();
    assert_eq!(cached.current_used, 10);

    let updated = repo.apply_usage_delta("t1", QuotaType::Users, -1000, None).await.unwrap();
    assert_eq!(updated.current_used, 0);

    // the cached copy must not survive the write
    let reread = repo.find_by_type("t1", QuotaType::Users).await.unwrap().unwrap();
    assert_eq!(reread.current_used, 0);
}

#[tokio::test]
async fn test_negative_delta_on_missing_quota_starts_at_zero() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().quota_repository();

    let created = repo.apply_usage_delta("t1", QuotaType::Projects, -5, None).await.unwrap();
    assert_eq!(created.current_used, 0);
}

#[tokio::test]
async fn test_concurrent_deltas_are_not_lost() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().quota_repository();
    repo.create(quota("t1", QuotaType::ApiCalls, 1_000, 0)).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.apply_usage_delta("t1", QuotaType::ApiCalls, 5, None).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let quota = repo.find_by_type("t1", QuotaType::ApiCalls).await.unwrap().unwrap();
    assert_eq!(quota.current_used, 50);
}

#[tokio::test]
async fn test_usage_delta_saturates_at_max() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().quota_repository();
    repo.create(quota("t1", QuotaType::ApiCalls, 100, i64::MAX - 1)).await.unwrap();

    let updated = repo.apply_usage_delta("t1", QuotaType::ApiCalls, 10, None).await.unwrap();
    assert_eq!(updated.current_used, i64::MAX);

    // the row still decodes on every read path
    assert_eq!(repo.list_by_tenant("t1").await.unwrap()[0].current_used, i64::MAX);
    let reread = repo.find_by_type("t1", QuotaType::ApiCalls).await.unwrap().unwrap();
    assert_eq!(reread.current_used, i64::MAX);

    let lowered = repo.apply_usage_delta("t1", QuotaType::ApiCalls, -5, None).await.unwrap();
    assert_eq!(lowered.current_used, i64::MAX - 5);
    assert_eq!(repo.delete_all_by_tenant("t1").await.unwrap(), 1);
}

#[tokio::test]
async fn test_second_quota_of_same_type_is_rejected() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().quota_repository();

    repo.create(quota("t1", QuotaType::Users, 10, 0)).await.unwrap();
    let err = repo.create(quota("t1", QuotaType::Users, 20, 0)).await.unwrap_err();
    assert!(err.is_constraint());
    assert_eq!(repo.list_by_tenant("t1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_mark_overdue_only_touches_pending_past_due() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().billing_repository();

    let late = repo.create(billing("t1", BillingStatus::Pending, -3)).await.unwrap();
    let paid = repo.create(billing("t1", BillingStatus::Paid, -3)).await.unwrap();
    let future = repo.create(billing("t1", BillingStatus::Pending, 10)).await.unwrap();

    // warm the cache so the sweep has something to invalidate
    repo.find_by_id(&late.id).await.unwrap();

    assert_eq!(repo.mark_overdue(Utc::now()).await.unwrap(), 1);

    let status = |b: Option<TenantBilling>| b.unwrap().status;
    assert_eq!(status(repo.find_by_id(&late.id).await.unwrap()), BillingStatus::Overdue);
    assert_eq!(status(repo.find_by_id(&paid.id).await.unwrap()), BillingStatus::Paid);
    assert_eq!(status(repo.find_by_id(&future.id).await.unwrap()), BillingStatus::Pending);

    assert_eq!(repo.mark_overdue(Utc::now()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_conditional_billing_update_checks_stored_status() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().billing_repository();
    let created = repo.create(billing("t1", BillingStatus::Pending, 5)).await.unwrap();

    // warm the cache with the pending copy
    repo.find_by_id(&created.id).await.unwrap();

    let mut paid = created.clone();
    paid.status = BillingStatus::Paid;
    paid.payment_method = Some("card".to_string());
    let written = repo
        .update_if_status(paid.clone(), &[BillingStatus::Pending, BillingStatus::Overdue])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(written.status, BillingStatus::Paid);
    assert_eq!(written.created_at, created.created_at);

    let mut again = paid.clone();
    again.payment_method = Some("wire".to_string());
    assert!(repo
        .update_if_status(again, &[BillingStatus::Pending, BillingStatus::Overdue])
        .await
        .unwrap()
        .is_none());

    let stored = repo.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BillingStatus::Paid);
    assert_eq!(stored.payment_method.as_deref(), Some("card"));

    let mut missing = created.clone();
    missing.id = new_id();
    let err = repo.update_if_status(missing, &[BillingStatus::Pending]).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound { .. }));
}

#[tokio::test]
async fn test_billing_list_filters_by_status() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().billing_repository();

    repo.create(billing("t1", BillingStatus::Pending, 5)).await.unwrap();
    repo.create(billing("t1", BillingStatus::Paid, 5)).await.unwrap();
    repo.create(billing("t2", BillingStatus::Pending, 5)).await.unwrap();

    let page = repo
        .list(
            BillingFilters {
                tenant_id: Some("t1".to_string()),
                status: Some(BillingStatus::Pending),
            },
            CursorInput::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].tenant_id, "t1");

    let created = repo.list_all_by_tenant("t1").await.unwrap();
    let by_invoice = repo
        .find_by_invoice_number(&created[0].invoice_number)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_invoice.id, created[0].id);
}

#[tokio::test]
async fn test_setting_update_is_visible_by_key() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().setting_repository();

    let created = repo.create(setting("t1", "site.name", "Acme")).await.unwrap();
    assert_eq!(
        repo.find_by_key("t1", "site.name").await.unwrap().unwrap().setting_value,
        "Acme"
    );

    let mut changed = created.clone();
    changed.setting_value = "Acme Corp".to_string();
    repo.update(changed).await.unwrap();

    let reread = repo.find_by_key("t1", "site.name").await.unwrap().unwrap();
    assert_eq!(reread.setting_value, "Acme Corp");
}

#[tokio::test]
async fn test_setting_list_filters() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().setting_repository();

    let mut public = setting("t1", "theme", "dark");
    public.is_public = true;
    public.category = "appearance".to_string();
    repo.create(public).await.unwrap();
    repo.create(setting("t1", "secret", "x")).await.unwrap();

    let public_only = repo
        .list(SettingFilters {
            tenant_id: "t1".to_string(),
            public_only: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(public_only.len(), 1);
    assert_eq!(public_only[0].setting_key, "theme");

    assert_eq!(repo.delete_all_by_tenant("t1").await.unwrap(), 2);
    assert!(repo.find_by_key("t1", "theme").await.unwrap().is_none());
}

#[tokio::test]
async fn test_relation_add_is_idempotent() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().relation_repository(RelationKind::Group);
    assert_eq!(repo.kind(), RelationKind::Group);

    assert!(!repo.exists("t1", "g1").await.unwrap());
    let first = repo.add(link(RelationKind::Group, "t1", "g1")).await.unwrap();
    let second = repo.add(link(RelationKind::Group, "t1", "g1")).await.unwrap();
    assert_eq!(first.id, second.id);

    // negative pair cache entry must have been dropped by the add
    assert!(repo.exists("t1", "g1").await.unwrap());
    assert_eq!(repo.target_ids_by_tenant("t1").await.unwrap(), vec!["g1".to_string()]);
    assert_eq!(repo.tenant_ids_by_target("g1").await.unwrap(), vec!["t1".to_string()]);
}

#[tokio::test]
async fn test_relation_remove_drops_all_views() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().relation_repository(RelationKind::Menu);

    repo.add(link(RelationKind::Menu, "t1", "m1")).await.unwrap();
    repo.add(link(RelationKind::Menu, "t1", "m2")).await.unwrap();
    assert_eq!(repo.target_ids_by_tenant("t1").await.unwrap().len(), 2);
    assert!(repo.exists("t1", "m1").await.unwrap());

    assert!(repo.remove("t1", "m1").await.unwrap());
    assert!(!repo.remove("t1", "m1").await.unwrap());

    assert!(!repo.exists("t1", "m1").await.unwrap());
    assert_eq!(repo.target_ids_by_tenant("t1").await.unwrap(), vec!["m2".to_string()]);
    assert!(repo.tenant_ids_by_target("m1").await.unwrap().is_empty());

    assert_eq!(repo.delete_all_by_tenant("t1").await.unwrap(), 1);
    assert!(repo.target_ids_by_tenant("t1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_relation_kinds_use_separate_tables() {
    let db = TestDatabase::new().await.unwrap();
    let factory = db.factory();

    factory
        .relation_repository(RelationKind::Dictionary)
        .add(link(RelationKind::Dictionary, "t1", "d1"))
        .await
        .unwrap();

    assert!(!factory.relation_repository(RelationKind::Option).exists("t1", "d1").await.unwrap());
    let page = factory
        .relation_repository(RelationKind::Dictionary)
        .list_by_tenant("t1", CursorInput::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].kind, RelationKind::Dictionary);
}

#[tokio::test]
async fn test_membership_views() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().user_tenant_repository();

    assert!(!repo.is_member("u1", "t1").await.unwrap());
    repo.add(membership("u1", "t1")).await.unwrap();
    repo.add(membership("u2", "t1")).await.unwrap();
    repo.add(membership("u1", "t2")).await.unwrap();

    assert!(repo.is_member("u1", "t1").await.unwrap());
    assert_eq!(repo.tenant_ids_by_user("u1").await.unwrap().len(), 2);
    assert_eq!(repo.user_ids_by_tenant("t1").await.unwrap().len(), 2);
    assert_eq!(repo.find_default("u1").await.unwrap().unwrap().tenant_id, "t1");

    assert_eq!(repo.delete_all_by_tenant("t1").await.unwrap(), 2);
    assert!(!repo.is_member("u1", "t1").await.unwrap());
    assert_eq!(repo.tenant_ids_by_user("u1").await.unwrap(), vec!["t2".to_string()]);
}

#[tokio::test]
async fn test_role_assignment_views() {
    let db = TestDatabase::new().await.unwrap();
    let repo = db.factory().user_tenant_role_repository();

    repo.assign(role_assignment("u1", "t1", "admin")).await.unwrap();
    repo.assign(role_assignment("u1", "t1", "admin")).await.unwrap();
    repo.assign(role_assignment("u1", "t1", "user")).await.unwrap();
    repo.assign(role_assignment("u2", "t1", "admin")).await.unwrap();

    assert_eq!(repo.role_ids("u1", "t1").await.unwrap().len(), 2);
    assert_eq!(repo.user_ids_with_role("t1", "admin").await.unwrap().len(), 2);
    assert!(repo.has_role("u1", "t1", "user").await.unwrap());

    assert!(repo.revoke("u1", "t1", "user").await.unwrap());
    assert!(!repo.has_role("u1", "t1", "user").await.unwrap());

    assert_eq!(repo.revoke_all("u1", "t1").await.unwrap(), 1);
    assert!(repo.role_ids("u1", "t1").await.unwrap().is_empty());
    assert_eq!(repo.user_ids_with_role("t1", "admin").await.unwrap(), vec!["u2".to_string()]);
}

#[tokio::test]
async fn test_uncached_factory_reads_through() {
    let db = TestDatabase::new().await.unwrap();
    let factory = db.uncached_factory();
    assert!(!factory.caches().is_enabled());

    let created = factory.tenant_repository().create(tenant("plain")).await.unwrap();
    let found = factory.tenant_repository().find_by_slug("plain").await.unwrap();
    assert_eq!(found.map(|t| t.id), Some(created.id));
    factory.health_check().await.unwrap();
}

#[tokio::test]
async fn test_corrupt_enum_value_is_internal_error() {
    use crate::entities::{tenant_quotas, TenantQuotas};
    use sea_orm::sea_query::Expr;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    let db = TestDatabase::new().await.unwrap();
    let repo = db.uncached_factory().quota_repository();
    let created = repo.create(quota("t1", QuotaType::Users, 10, 0)).await.unwrap();

    TenantQuotas::update_many()
        .col_expr(tenant_quotas::Column::Unit, Expr::value("furlongs"))
        .filter(tenant_quotas::Column::Id.eq(created.id.as_str()))
        .exec(db.connection.get_connection())
        .await
        .unwrap();

    let err = repo.find_by_id(&created.id).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Internal { .. }));
}
