//! Account repository.
//!
//! Accounts hold the running balance the ledger repository maintains.
//! Editing or deleting an account is blocked while any of its
//! transactions sits in a closed month; an allowed delete removes the
//! account's transactions with it.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, DatabaseConnection, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use monedero_core::ledger::{LedgerError as CoreLedgerError, LedgerService};
use monedero_core::period::Period;
use monedero_shared::AccountKind;

use crate::entities::{accounts, transactions};
use crate::repositories::period::PeriodRepository;

/// Error types for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account absent or not owned by the caller.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// A transaction on this account falls in a closed month.
    #[error("Account has transactions in closed month {month:02}/{year}")]
    PinnedByClosedMonth {
        /// Calendar year of the closed month.
        year: i32,
        /// Calendar month (1-12).
        month: u32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Fields accepted when creating or rewriting an account.
#[derive(Debug, Clone)]
pub struct AccountDraft {
    /// Display name.
    pub name: String,
    /// Account classification.
    pub kind: AccountKind,
    /// Balance to set. On create this is the opening balance.
    pub balance: Decimal,
    /// Free-text description.
    pub description: Option<String>,
}

/// Repository for account CRUD with closed-month pinning guards.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        draft: AccountDraft,
    ) -> Result<accounts::Model, AccountError> {
        let now = Utc::now();
        let model = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(draft.name),
            kind: Set(draft.kind.into()),
            balance: Set(draft.balance),
            description: Set(draft.description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Lists a user's accounts by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await
    }

    /// Gets an account by ID, scoped to the owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or foreign, or a database error.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Rewrites an account's fields, including a manual balance set.
    ///
    /// Rejected while any transaction on the account falls in a closed
    /// month.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `PinnedByClosedMonth`, or a database error.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        draft: AccountDraft,
    ) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;

        let existing = accounts::Entity::find_by_id(id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        Self::ensure_unpinned(&txn, user_id, id).await?;

        let mut active: accounts::ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.kind = Set(draft.kind.into());
        active.balance = Set(draft.balance);
        active.description = Set(draft.description);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes an account and, through the foreign key cascade, all of
    /// its transactions. Balances elsewhere are untouched.
    ///
    /// Rejected while any transaction on the account falls in a closed
    /// month.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `PinnedByClosedMonth`, or a database error.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AccountError> {
        let txn = self.db.begin().await?;

        let existing = accounts::Entity::find_by_id(id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        Self::ensure_unpinned(&txn, user_id, id).await?;

        existing.delete(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Verifies no transaction on the account sits in a closed month.
    /// The closed-month set is fetched once; each posting date is checked
    /// against it in memory.
    async fn ensure_unpinned<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        account_id: Uuid,
    ) -> Result<(), AccountError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .all(conn)
            .await?;
        let closed = PeriodRepository::closed_set_on(conn, user_id).await?;

        LedgerService::ensure_unpinned(rows.into_iter().map(|row| row.posted_on), |date| {
            let period = Period::of(date);
            closed.contains(&(period.year, period.month))
        })
        .map_err(|err| match err {
            CoreLedgerError::PeriodClosed { year, month } => {
                AccountError::PinnedByClosedMonth { year, month }
            }
            other => AccountError::Database(DbErr::Custom(other.to_string())),
        })
    }
}
