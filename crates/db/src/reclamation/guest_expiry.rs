//! Guest-expiry sweep: removes expired guest users and their subtrees.

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, TransactionTrait};
use uuid::Uuid;

use monedero_core::reclamation::is_expired_guest;

use crate::entities::{accounts, categories, closed_periods, transactions, users};

/// Row counts removed by one guest sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuestSweepOutcome {
    /// Guest users removed.
    pub users: u64,
    /// Their accounts.
    pub accounts: u64,
    /// Their categories.
    pub categories: u64,
    /// Their transactions.
    pub transactions: u64,
    /// Their closed-month records.
    pub closed_periods: u64,
}

/// Removes guests whose `expires_at` has passed, together with every row
/// they own, in one database transaction per run.
#[derive(Debug, Clone)]
pub struct GuestExpirySweep {
    db: DatabaseConnection,
}

impl GuestExpirySweep {
    /// Creates a new guest-expiry sweep.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Runs one sweep pass against the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or the deletion transaction fails.
    pub async fn run(&self) -> Result<GuestSweepOutcome, DbErr> {
        self.run_at(Utc::now()).await
    }

    /// Runs one sweep pass against an explicit `now`.
    ///
    /// Idempotent: a pass that finds no expired guests performs no
    /// writes, so re-running after a completed pass is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or the deletion transaction fails.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<GuestSweepOutcome, DbErr> {
        let candidates = users::Entity::find()
            .filter(users::Column::IsGuest.eq(true))
            .filter(users::Column::ExpiresAt.lte(now))
            .all(&self.db)
            .await?;

        let ids: Vec<Uuid> = candidates
            .into_iter()
            .filter(|user| {
                is_expired_guest(
                    user.is_guest,
                    user.expires_at.map(|t| t.with_timezone(&Utc)),
                    now,
                )
            })
            .map(|user| user.id)
            .collect();

        if ids.is_empty() {
            return Ok(GuestSweepOutcome::default());
        }

        // One transaction per pass; a crash mid-pass leaves every
        // candidate subtree either fully present or fully gone.
        let txn = self.db.begin().await?;

        let transactions = transactions::Entity::delete_many()
            .filter(transactions::Column::UserId.is_in(ids.clone()))
            .exec(&txn)
            .await?
            .rows_affected;
        let categories = categories::Entity::delete_many()
            .filter(categories::Column::UserId.is_in(ids.clone()))
            .exec(&txn)
            .await?
            .rows_affected;
        let accounts = accounts::Entity::delete_many()
            .filter(accounts::Column::UserId.is_in(ids.clone()))
            .exec(&txn)
            .await?
            .rows_affected;
        let closed_periods = closed_periods::Entity::delete_many()
            .filter(closed_periods::Column::UserId.is_in(ids.clone()))
            .exec(&txn)
            .await?
            .rows_affected;
        let removed_users = users::Entity::delete_many()
            .filter(users::Column::Id.is_in(ids))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;

        Ok(GuestSweepOutcome {
            users: removed_users,
            accounts,
            categories,
            transactions,
            closed_periods,
        })
    }
}
