use adoption_core::domain::value_objects::{adoptions::SyncReport, payments::PendingRefreshReport};
use anyhow::Result;
use backend::usecases::{payments::PaymentUseCase, reconciliation::ReconciliationUseCase};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::config_model::Reconcile;

/// Outcome of one pass. A step that failed outright is `None`.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct PassReport {
    pub pending: Option<PendingRefreshReport>,
    pub sync: Option<SyncReport>,
}

pub struct ReconcileLoop {
    payments: Arc<PaymentUseCase>,
    reconciliation: Arc<ReconciliationUseCase>,
    config: Reconcile,
}

impl ReconcileLoop {
    pub fn new(
        payments: Arc<PaymentUseCase>,
        reconciliation: Arc<ReconciliationUseCase>,
        config: Reconcile,
    ) -> Self {
        Self {
            payments,
            reconciliation,
            config,
        }
    }

    pub async fn run(self: Arc<Self>) -> Result<()> {
        info!(
            interval_secs = self.config.interval.as_secs(),
            batch_size = self.config.batch_size,
            "reconcile: starting worker loop"
        );
        loop {
            self.run_once().await;
            tokio::time::sleep(self.config.interval).await;
        }
    }

    /// Asks the gateway about stale pending payments, then materialises every
    /// settled payment still missing its adoption. Neither step stops the other.
    pub async fn run_once(&self) -> PassReport {
        let min_age = chrono::Duration::from_std(self.config.pending_min_age)
            .unwrap_or_else(|_| chrono::Duration::minutes(2));

        let pending = match self
            .payments
            .refresh_stale_pending(min_age, self.config.batch_size)
            .await
        {
            Ok(report) => Some(report),
            Err(err) => {
                error!(error = %err, "reconcile: pending refresh failed");
                None
            }
        };

        let sync = match self
            .reconciliation
            .sync_missing_adoptions(self.config.batch_size)
            .await
        {
            Ok(report) => Some(report),
            Err(err) => {
                error!(error = %err, "reconcile: adoption sweep failed");
                None
            }
        };

        PassReport { pending, sync }
    }
}
