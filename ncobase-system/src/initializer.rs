//! Runs the seed steps once per database and records the outcome

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use ncobase_api_types::{InitializationReport, InitializationStatus, StepOutcome, StepReport};
use ncobase_config::SystemConfig;
use ncobase_interfaces::RepositoryFactory;
use ncobase_storage::entities::{system_states, SystemStates};
use ncobase_storage::sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use ncobase_storage::DatabaseConnection;

use crate::context::SeedContext;
use crate::error::{SystemError, SystemResult};
use crate::steps::{default_steps, SeedStep};

/// Key of the `system_states` row written after a successful run
pub const INITIALIZED_KEY: &str = "initialized";

pub struct Initializer {
    ctx: SeedContext,
    steps: Vec<Box<dyn SeedStep>>,
    // one run at a time per process
    running: Mutex<()>,
}

impl Initializer {
    pub fn new(db: DatabaseConnection, repositories: Arc<dyn RepositoryFactory>, config: SystemConfig) -> Self {
        Self::from_context(SeedContext::new(db, repositories, config))
    }

    pub fn from_context(ctx: SeedContext) -> Self {
        Self::with_steps(ctx, default_steps())
    }

    pub fn with_steps(ctx: SeedContext, steps: Vec<Box<dyn SeedStep>>) -> Self {
        Self {
            ctx,
            steps,
            running: Mutex::new(()),
        }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub async fn status(&self) -> SystemResult<InitializationStatus> {
        let marker = SystemStates::find_by_id(INITIALIZED_KEY)
            .one(self.ctx.connection())
            .await?;
        Ok(InitializationStatus {
            initialized: marker.is_some(),
            initialized_at: marker.map(|m| m.updated_at),
        })
    }

    /// Run every step that has not seeded its data yet.
    ///
    /// Fails with [`SystemError::AlreadyInitialized`] when a previous run
    /// completed and `allow_reinitialization` is false. A failing step stops
    /// the run; the marker is only written once every step has passed.
    pub async fn execute(&self, allow_reinitialization: bool) -> SystemResult<InitializationReport> {
        let _guard = self.running.lock().await;

        let marker = SystemStates::find_by_id(INITIALIZED_KEY)
            .one(self.ctx.connection())
            .await?;
        if marker.is_some() && !allow_reinitialization {
            return Err(SystemError::AlreadyInitialized);
        }

        info!("Starting system initialization ({} steps)", self.steps.len());
        let mut reports = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let name = step.name();
            let seeded = step
                .is_seeded(&self.ctx)
                .await
                .map_err(|source| SystemError::Step { step: name, source })?;

            let outcome = if seeded {
                info!("Step '{}' already seeded, skipping", name);
                StepOutcome::Skipped
            } else {
                step.seed(&self.ctx).await.map_err(|source| {
                    warn!("Step '{}' failed: {}", name, source);
                    SystemError::Step { step: name, source }
                })?;
                StepOutcome::Executed
            };
            reports.push(StepReport {
                step: name.to_string(),
                outcome,
            });
        }

        let now = Utc::now();
        let value = json!({
            "initialized_at": now.to_rfc3339(),
            "steps": reports.iter().map(|r| r.step.as_str()).collect::<Vec<_>>(),
        });
        match marker {
            Some(existing) => {
                let mut active = existing.into_active_model();
                active.value = Set(value);
                active.updated_at = Set(now);
                active.update(self.ctx.connection()).await?;
            }
            None => {
                system_states::ActiveModel {
                    key: Set(INITIALIZED_KEY.to_string()),
                    value: Set(value),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(self.ctx.connection())
                .await?;
            }
        }

        let report = InitializationReport {
            steps: reports,
            initialized_at: now,
        };
        info!(
            "System initialization finished, executed: [{}]",
            report.executed_steps().collect::<Vec<_>>().join(", ")
        );
        Ok(report)
    }
}
