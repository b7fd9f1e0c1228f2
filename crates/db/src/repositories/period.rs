//! Period repository: the closed-month registry.
//!
//! Sole authority on "is date D closed for user U". Closing is
//! append-only; no operation here (or anywhere else) removes a closure.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use monedero_core::period::{self, Period, PeriodError as CorePeriodError};

use crate::entities::{closed_periods, users};

/// Error types for period operations.
#[derive(Debug, Error)]
pub enum PeriodError {
    /// The user does not exist.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// The month is already closed for this user.
    #[error("Month {month:02}/{year} is already closed")]
    AlreadyClosed {
        /// Calendar year.
        year: i32,
        /// Calendar month (1-12).
        month: u32,
    },

    /// Closing months is gated behind a paid tier.
    #[error("Free tier users cannot close months")]
    TierNotAllowed,

    /// Month outside 1-12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CorePeriodError> for PeriodError {
    fn from(err: CorePeriodError) -> Self {
        match err {
            CorePeriodError::AlreadyClosed { year, month } => Self::AlreadyClosed { year, month },
            CorePeriodError::TierNotAllowed => Self::TierNotAllowed,
            CorePeriodError::InvalidMonth(month) => Self::InvalidMonth(month),
        }
    }
}

/// Repository for the closed-period registry.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns true if the date's month is closed for the user.
    ///
    /// Pure read, no side effects.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_closed(&self, user_id: Uuid, date: NaiveDate) -> Result<bool, DbErr> {
        Self::is_closed_on(&self.db, user_id, Period::of(date)).await
    }

    /// Closes a month for a user.
    ///
    /// Tier-gated (Free users rejected) and idempotence-gated (duplicate
    /// closes rejected). The duplicate check and the insert run inside
    /// one database transaction so a close serializes against in-flight
    /// ledger writes for the same user.
    ///
    /// # Errors
    ///
    /// Returns `TierNotAllowed`, `AlreadyClosed`, `InvalidMonth`,
    /// `UserNotFound`, or a database error.
    pub async fn close(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<closed_periods::Model, PeriodError> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(PeriodError::UserNotFound(user_id))?;

        let txn = self.db.begin().await?;

        let already_closed = Self::exists_on(&txn, user_id, year, month).await?;
        period::validate_close(user.tier.into(), year, month, already_closed)?;

        // Safe after validate_close bounds the month to 1..=12.
        let month_column =
            i32::try_from(month).map_err(|_| PeriodError::InvalidMonth(month))?;

        let closure = closed_periods::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            year: Set(year),
            month: Set(month_column),
            closed_at: Set(Utc::now().into()),
        };
        let model = closure.insert(&txn).await?;

        txn.commit().await?;
        Ok(model)
    }

    /// Connection-generic closed check, usable inside an open ledger
    /// transaction.
    pub(crate) async fn is_closed_on<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        period: Period,
    ) -> Result<bool, DbErr> {
        Self::exists_on(conn, user_id, period.year, period.month).await
    }

    /// All closed months for a user as a `(year, month)` set, fetched
    /// once so per-transaction guards never re-query.
    pub(crate) async fn closed_set_on<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
    ) -> Result<HashSet<(i32, u32)>, DbErr> {
        let rows = closed_periods::Entity::find()
            .filter(closed_periods::Column::UserId.eq(user_id))
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| u32::try_from(row.month).ok().map(|m| (row.year, m)))
            .collect())
    }

    async fn exists_on<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<bool, DbErr> {
        let month_column = i32::try_from(month).unwrap_or(-1);
        let existing = closed_periods::Entity::find()
            .filter(closed_periods::Column::UserId.eq(user_id))
            .filter(closed_periods::Column::Year.eq(year))
            .filter(closed_periods::Column::Month.eq(month_column))
            .one(conn)
            .await?;

        Ok(existing.is_some())
    }
}
