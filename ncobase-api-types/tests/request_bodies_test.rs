//! Request bodies are reachable from the crate root, the way every service
//! and handler imports them

use ncobase_api_types::{
    AddRelationBody, AddUserTenantBody, AssignRoleBody, BillingStatus, BulkSettingsBody, CreateBillingBody,
    CreateQuotaBody, CreateSettingBody, CreateTenantBody, GenerateInvoiceBody, InitializeBody, ProcessPaymentBody,
    QuotaCheckBody, QuotaType, QuotaUsageBody, SetSettingBody, UpdateBillingBody, UpdateQuotaBody, UpdateSettingBody,
    UpdateTenantBody,
};
use serde_json::json;
use validator::Validate;

#[test]
fn test_root_bodies_deserialize_and_validate() {
    let tenant: CreateTenantBody = serde_json::from_value(json!({"name": "Acme", "slug": "acme"})).unwrap();
    assert!(tenant.validate().is_ok());

    let update: UpdateTenantBody = serde_json::from_value(json!({"slug": "x"})).unwrap();
    assert!(update.validate().is_err());

    let quota: CreateQuotaBody =
        serde_json::from_value(json!({"quota_type": "users", "max_value": 10, "unit": "count"})).unwrap();
    assert_eq!(quota.quota_type, QuotaType::Users);
    let _: UpdateQuotaBody = serde_json::from_value(json!({})).unwrap();
    let usage: QuotaUsageBody = serde_json::from_value(json!({"quota_type": "users", "delta": -3})).unwrap();
    assert_eq!(usage.delta, -3);
    let check: QuotaCheckBody = serde_json::from_value(json!({"quota_type": "users", "amount": 1})).unwrap();
    assert!(check.validate().is_ok());

    let billing: CreateBillingBody = serde_json::from_value(json!({"amount": 5.0})).unwrap();
    assert!(billing.validate().is_ok());
    let update: UpdateBillingBody = serde_json::from_value(json!({"status": "cancelled"})).unwrap();
    assert_eq!(update.status, Some(BillingStatus::Cancelled));
    let payment: ProcessPaymentBody = serde_json::from_value(json!({"payment_method": "card"})).unwrap();
    assert_eq!(payment.payment_method, "card");
    let _: GenerateInvoiceBody = serde_json::from_value(json!({"billing_period": "monthly"})).unwrap();

    let _: CreateSettingBody = serde_json::from_value(json!({"setting_key": "theme", "setting_value": "dark"})).unwrap();
    let _: UpdateSettingBody = serde_json::from_value(json!({})).unwrap();
    let _: SetSettingBody = serde_json::from_value(json!({"value": true})).unwrap();
    let bulk: BulkSettingsBody = serde_json::from_value(json!({"settings": {"a": 1, "b": "x"}})).unwrap();
    assert_eq!(bulk.settings.len(), 2);

    let _: AddRelationBody = serde_json::from_value(json!({"target_id": "g1"})).unwrap();
    let _: AddUserTenantBody = serde_json::from_value(json!({"user_id": "u1"})).unwrap();
    let _: AssignRoleBody = serde_json::from_value(json!({"role_id": "r1"})).unwrap();
    let init: InitializeBody = serde_json::from_value(json!({})).unwrap();
    assert!(!init.allow_reinitialization);
}
