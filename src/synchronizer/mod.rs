//! One full scan, diff and apply pass over a source/destination pair.

use crate::config::{SyncEndpoint, ValidatedConfig};
use crate::logging::AuditLog;
use crate::reconciliation::{
    build_reconciliation_plan, execute_reconciliation, CycleReport, ExecuteError, ExecuteOptions,
    FailurePolicy, ReconciliationPlan,
};
use std::sync::Arc;

/// Converges a destination folder toward a source folder.
///
/// Holds no state between cycles: every call to [`Synchronizer::run_cycle`]
/// scans both trees from scratch.
pub struct Synchronizer {
    source: SyncEndpoint,
    destination: SyncEndpoint,
    log: Arc<dyn AuditLog>,
    options: ExecuteOptions,
}

impl Synchronizer {
    pub fn new(source: SyncEndpoint, destination: SyncEndpoint, log: Arc<dyn AuditLog>) -> Self {
        Self {
            source,
            destination,
            log,
            options: ExecuteOptions::default(),
        }
    }

    pub fn from_config(config: &ValidatedConfig, log: Arc<dyn AuditLog>) -> Self {
        Self::new(config.source.clone(), config.destination.clone(), log)
            .with_failure_policy(config.failure_policy)
            .with_dry_run(config.dry_run)
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.options.failure_policy = policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.options.dry_run = dry_run;
        self
    }

    pub fn audit_log(&self) -> &dyn AuditLog {
        self.log.as_ref()
    }

    /// Compute the current plan without applying it.
    pub fn plan(&self) -> ReconciliationPlan {
        build_reconciliation_plan(&self.source, &self.destination, self.log.as_ref())
    }

    /// Scan, diff and apply once.
    pub async fn run_cycle(&self) -> Result<CycleReport, ExecuteError> {
        let plan = self.plan();
        execute_reconciliation(
            &self.source,
            &self.destination,
            plan,
            self.options,
            self.log.as_ref(),
        )
        .await
    }
}
