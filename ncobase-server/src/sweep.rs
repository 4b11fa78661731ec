//! Background job that flips past-due pending invoices to overdue

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use ncobase_tenant::BillingService;

/// Run `mark_overdue` every `period` until the returned handle is aborted.
/// The first pass happens immediately.
pub fn spawn_overdue_sweep(billing: Arc<BillingService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match billing.mark_overdue().await {
                Ok(changed) => debug!("Overdue sweep finished, {} records updated", changed),
                // a failed pass is retried on the next tick
                Err(e) => warn!("Overdue sweep failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use ncobase_api_types::{BillingPeriod, BillingStatus, CreateBillingBody, CreateTenantBody};
    use ncobase_config::BillingConfig;
    use ncobase_interfaces::RepositoryFactory;
    use ncobase_storage::testing::TestDatabase;
    use ncobase_tenant::{Collaborators, TenantServices};

    #[tokio::test]
    async fn test_sweep_marks_past_due_invoices() {
        let db = TestDatabase::new().await.unwrap();
        let repositories: Arc<dyn RepositoryFactory> = Arc::new(db.uncached_factory());
        let services = TenantServices::new(repositories, Collaborators::default(), BillingConfig::default());

        let tenant = services
            .tenants
            .create(
                CreateTenantBody {
                    name: "Acme".to_string(),
                    slug: "acme".to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        let record = services
            .billing
            .create(
                &tenant.id,
                CreateBillingBody {
                    billing_period: BillingPeriod::Monthly,
                    period_start: None,
                    period_end: None,
                    amount: 10.0,
                    currency: None,
                    invoice_number: None,
                    description: None,
                    due_date: Some(Utc::now() - ChronoDuration::days(2)),
                    usage_details: None,
                    extras: None,
                },
                None,
            )
            .await
            .unwrap();

        let handle = spawn_overdue_sweep(services.billing.clone(), Duration::from_secs(3600));

        let mut status = BillingStatus::Pending;
        for _ in 0..50 {
            status = services.billing.get(&tenant.id, &record.billing.id).await.unwrap().billing.status;
            if status == BillingStatus::Overdue {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        handle.abort();

        assert_eq!(status, BillingStatus::Overdue);
    }
}
