//! Ledger repository: the only mutation path for transactions.
//!
//! Every operation validates its preconditions through the pure
//! `LedgerService`, then applies the transaction row write and the
//! account balance write inside one database transaction. Either both
//! persist or neither does; a transaction is never visible without its
//! balance effect.

use chrono::{NaiveDate, Utc, Weekday};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use monedero_core::ledger::{
    AccountRef, BalanceChange, CategoryRef, LedgerError as CoreLedgerError, LedgerService,
    PostingSnapshot, TransactionInput,
};
use monedero_core::period::Period;

use crate::entities::{accounts, categories, transactions};
use crate::repositories::period::PeriodRepository;

/// Error types for ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transaction absent or not owned by the caller.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Account absent or not owned by the caller.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Category absent or not owned by the caller.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Account or category belongs to a different user.
    #[error("Referenced entity does not belong to the current user")]
    OwnerMismatch,

    /// Amount failed validation (zero or negative).
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The posting month is closed for this user.
    #[error("Month {month:02}/{year} is closed, no changes allowed")]
    PeriodClosed {
        /// Calendar year of the closed month.
        year: i32,
        /// Calendar month (1-12).
        month: u32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CoreLedgerError> for LedgerError {
    fn from(err: CoreLedgerError) -> Self {
        match err {
            CoreLedgerError::AccountNotFound(id) => Self::AccountNotFound(id),
            CoreLedgerError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            CoreLedgerError::OwnerMismatch => Self::OwnerMismatch,
            CoreLedgerError::ZeroAmount | CoreLedgerError::NegativeAmount => {
                Self::InvalidAmount(err.to_string())
            }
            CoreLedgerError::PeriodClosed { year, month } => Self::PeriodClosed { year, month },
        }
    }
}

/// Ledger repository for transaction CRUD with balance bookkeeping.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a transaction and applies its signed delta to the account
    /// balance, atomically.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `PeriodClosed` if the posting month is
    /// closed for the user, or a database error.
    pub async fn create(&self, input: TransactionInput) -> Result<transactions::Model, LedgerError> {
        let txn = self.db.begin().await?;

        let account = accounts::Entity::find_by_id(input.account_id).one(&txn).await?;
        let category = categories::Entity::find_by_id(input.category_id).one(&txn).await?;
        let closed =
            PeriodRepository::is_closed_on(&txn, input.user_id, Period::of(input.posted_on))
                .await?;

        let account_ref = account.as_ref().map(|a| AccountRef {
            id: a.id,
            owner_id: a.user_id,
        });
        let category_ref = category.as_ref().map(|c| CategoryRef {
            id: c.id,
            owner_id: c.user_id,
            kind: c.kind.into(),
        });

        let posting = LedgerService::validate_create(
            &input,
            |_| account_ref,
            |_| category_ref,
            |_| closed,
        )?;

        let now = Utc::now();
        let model = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            account_id: Set(input.account_id),
            category_id: Set(input.category_id),
            posted_on: Set(input.posted_on),
            amount: Set(input.amount),
            note: Set(input.note.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = model.insert(&txn).await?;

        Self::adjust_balance(
            &txn,
            BalanceChange {
                account_id: input.account_id,
                delta: posting.delta,
            },
        )
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Rewrites a transaction: reverses the old signed delta from the old
    /// account, writes the new fields, applies the new delta to the
    /// (possibly different) account. One database transaction.
    ///
    /// Only the **new** posting date is checked against closed months;
    /// the old date is not rechecked, so a transaction stuck in a closed
    /// month can be edited out of it. Documented by
    /// `test_update_escapes_closed_month` in the integration suite.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transaction is absent or foreign, a
    /// validation error, `PeriodClosed`, or a database error.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: TransactionInput,
    ) -> Result<transactions::Model, LedgerError> {
        let txn = self.db.begin().await?;

        let existing = transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(LedgerError::NotFound(id))?;

        let old_category = categories::Entity::find_by_id(existing.category_id)
            .one(&txn)
            .await?
            .ok_or(LedgerError::CategoryNotFound(existing.category_id))?;
        let old = PostingSnapshot {
            account_id: existing.account_id,
            kind: old_category.kind.into(),
            amount: existing.amount,
            posted_on: existing.posted_on,
        };

        let account = accounts::Entity::find_by_id(input.account_id).one(&txn).await?;
        let category = categories::Entity::find_by_id(input.category_id).one(&txn).await?;
        let closed =
            PeriodRepository::is_closed_on(&txn, user_id, Period::of(input.posted_on)).await?;

        let account_ref = account.as_ref().map(|a| AccountRef {
            id: a.id,
            owner_id: a.user_id,
        });
        let category_ref = category.as_ref().map(|c| CategoryRef {
            id: c.id,
            owner_id: c.user_id,
            kind: c.kind.into(),
        });

        let plan = LedgerService::plan_update(
            &old,
            &input,
            |_| account_ref,
            |_| category_ref,
            |_| closed,
        )?;

        Self::adjust_balance(&txn, plan.reversal).await?;

        let mut active: transactions::ActiveModel = existing.into();
        active.posted_on = Set(input.posted_on);
        active.amount = Set(input.amount);
        active.account_id = Set(input.account_id);
        active.category_id = Set(input.category_id);
        active.note = Set(input.note.clone());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        Self::adjust_balance(&txn, plan.application).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a transaction and reverses its signed delta, atomically.
    ///
    /// The transaction's existing posting month must be open.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `PeriodClosed`, or a database error.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), LedgerError> {
        let txn = self.db.begin().await?;

        let existing = transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(LedgerError::NotFound(id))?;

        let category = categories::Entity::find_by_id(existing.category_id)
            .one(&txn)
            .await?
            .ok_or(LedgerError::CategoryNotFound(existing.category_id))?;
        let old = PostingSnapshot {
            account_id: existing.account_id,
            kind: category.kind.into(),
            amount: existing.amount,
            posted_on: existing.posted_on,
        };

        let closed =
            PeriodRepository::is_closed_on(&txn, user_id, Period::of(existing.posted_on)).await?;

        let reversal = LedgerService::plan_delete(&old, |_| closed)?;

        Self::adjust_balance(&txn, reversal).await?;
        transactions::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Gets a transaction by ID, scoped to the owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or foreign, or a database error.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<transactions::Model, LedgerError> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(LedgerError::NotFound(id))
    }

    /// Lists all transactions for a user, newest posting date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::PostedOn)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Lists transactions posted in the half-open range `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::PostedOn.gte(from))
            .filter(transactions::Column::PostedOn.lt(to))
            .order_by_desc(transactions::Column::PostedOn)
            .all(&self.db)
            .await
    }

    /// Lists the week's transactions (Sunday-based week containing
    /// `today`).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_week_of(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        let week = today.week(Weekday::Sun);
        let start = week.first_day();
        let end = start + chrono::Duration::days(7);
        self.list_between(user_id, start, end).await
    }

    /// Lists the calendar month's transactions for the month containing
    /// `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_month_of(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        let period = Period::of(today);
        self.list_between(user_id, period.first_day(), period.next().first_day())
            .await
    }

    /// Applies one signed balance change to an account inside the open
    /// transaction. The balance is read fresh here, never cached across
    /// calls.
    async fn adjust_balance(
        txn: &DatabaseTransaction,
        change: BalanceChange,
    ) -> Result<(), LedgerError> {
        let account = accounts::Entity::find_by_id(change.account_id)
            .one(txn)
            .await?
            .ok_or(LedgerError::AccountNotFound(change.account_id))?;

        let new_balance = account.balance + change.delta;
        let mut active: accounts::ActiveModel = account.into();
        active.balance = Set(new_balance);
        active.updated_at = Set(Utc::now().into());
        active.update(txn).await?;

        Ok(())
    }
}
