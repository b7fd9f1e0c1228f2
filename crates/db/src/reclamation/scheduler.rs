//! Scheduler that owns the two reclamation sweep loops.

use chrono::Local;
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use monedero_core::reclamation::{delay_until_midnight, RETENTION_SWEEP_INTERVAL};
use monedero_shared::ReclamationConfig;

use super::{FreeTierRetentionSweep, GuestExpirySweep};

/// Handles to the running sweep loops.
///
/// Both loops log failures and keep running; a failed pass is retried on
/// the next tick.
#[derive(Debug)]
pub struct ReclamationScheduler {
    guest: JoinHandle<()>,
    retention: Option<JoinHandle<()>>,
}

impl ReclamationScheduler {
    /// Spawns the sweep loops.
    ///
    /// The guest loop ticks immediately and then on the configured
    /// interval. The retention loop, when enabled, waits until the next
    /// local midnight and then ticks daily.
    #[must_use]
    pub fn start(db: DatabaseConnection, config: &ReclamationConfig) -> Self {
        let guest_interval =
            std::time::Duration::from_secs(config.guest_sweep_interval_secs);
        let guest_sweep = GuestExpirySweep::new(db.clone());
        let guest = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(guest_interval);
            loop {
                ticker.tick().await;
                match guest_sweep.run().await {
                    Ok(outcome) if outcome.users > 0 => info!(
                        users = outcome.users,
                        accounts = outcome.accounts,
                        categories = outcome.categories,
                        transactions = outcome.transactions,
                        closed_periods = outcome.closed_periods,
                        "removed expired guest subtrees"
                    ),
                    Ok(_) => debug!("guest sweep found no expired guests"),
                    Err(err) => warn!(error = %err, "guest sweep failed"),
                }
            }
        });

        let retention = config.retention_enabled.then(|| {
            let sweep = FreeTierRetentionSweep::new(db);
            tokio::spawn(async move {
                tokio::time::sleep(delay_until_midnight(Local::now())).await;
                let mut ticker = tokio::time::interval(RETENTION_SWEEP_INTERVAL);
                loop {
                    ticker.tick().await;
                    match sweep.run().await {
                        Ok(outcome) if outcome.transactions > 0 => info!(
                            transactions = outcome.transactions,
                            window_start = %outcome.window_start,
                            window_end = %outcome.window_end,
                            "purged free-tier transactions"
                        ),
                        Ok(_) => debug!("retention sweep found nothing to purge"),
                        Err(err) => warn!(error = %err, "retention sweep failed"),
                    }
                }
            })
        });

        Self { guest, retention }
    }

    /// Stops both loops. An in-flight database transaction either
    /// commits or rolls back on its own; aborting here never leaves a
    /// half-applied pass.
    pub fn shutdown(self) {
        self.guest.abort();
        if let Some(handle) = self.retention {
            handle.abort();
        }
    }
}
