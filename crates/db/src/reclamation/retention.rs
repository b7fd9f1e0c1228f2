//! Free-tier retention sweep: purges last month's transactions for free
//! users.
//!
//! The purge is a plain row deletion. Account balances are deliberately
//! left as they are; the removed history keeps its cumulative effect on
//! the balance, the rows themselves just age out of free-tier storage.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, TransactionTrait};
use uuid::Uuid;

use monedero_core::reclamation::retention_window;

use crate::entities::sea_orm_active_enums::SubscriptionTier;
use crate::entities::{transactions, users};

/// Result of one retention sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionOutcome {
    /// Transactions purged across all free users.
    pub transactions: u64,
    /// Start of the purged window (inclusive).
    pub window_start: NaiveDate,
    /// End of the purged window (exclusive).
    pub window_end: NaiveDate,
}

/// Deletes free-tier transactions posted in the previous calendar month.
#[derive(Debug, Clone)]
pub struct FreeTierRetentionSweep {
    db: DatabaseConnection,
}

impl FreeTierRetentionSweep {
    /// Creates a new retention sweep.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Runs one sweep pass against the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or the deletion transaction fails.
    pub async fn run(&self) -> Result<RetentionOutcome, DbErr> {
        self.run_at(Utc::now()).await
    }

    /// Runs one sweep pass against an explicit `now`.
    ///
    /// Idempotent: once the previous month's rows are gone, re-running
    /// within the same month deletes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or the deletion transaction fails.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RetentionOutcome, DbErr> {
        let (window_start, window_end) = retention_window(now);

        let free_ids: Vec<Uuid> = users::Entity::find()
            .filter(users::Column::Tier.eq(SubscriptionTier::Free))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|user| user.id)
            .collect();

        if free_ids.is_empty() {
            return Ok(RetentionOutcome {
                transactions: 0,
                window_start,
                window_end,
            });
        }

        let txn = self.db.begin().await?;

        let purged = transactions::Entity::delete_many()
            .filter(transactions::Column::UserId.is_in(free_ids))
            .filter(transactions::Column::PostedOn.gte(window_start))
            .filter(transactions::Column::PostedOn.lt(window_end))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;

        Ok(RetentionOutcome {
            transactions: purged,
            window_start,
            window_end,
        })
    }
}
