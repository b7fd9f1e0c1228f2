//! Category repository.
//!
//! A category's kind (income or expense) supplies the sign for every
//! transaction posted against it, so edits are guarded the same way as
//! accounts: blocked while any referencing transaction sits in a closed
//! month. Names are unique per user.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, DatabaseConnection, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use monedero_core::ledger::{LedgerError as CoreLedgerError, LedgerService};
use monedero_core::period::Period;
use monedero_shared::OperationKind;

use crate::entities::{categories, transactions};
use crate::repositories::period::PeriodRepository;

/// Error types for category operations.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Category absent or not owned by the caller.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// The user already has a category with this name.
    #[error("Category name already in use: {0}")]
    DuplicateName(String),

    /// A transaction in this category falls in a closed month.
    #[error("Category has transactions in closed month {month:02}/{year}")]
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

/// Fields accepted when creating or rewriting a category.
#[derive(Debug, Clone)]
pub struct CategoryDraft {
    /// Display name, unique per user.
    pub name: String,
    /// Income or expense.
    pub kind: OperationKind,
}

/// Repository for category CRUD with closed-month pinning guards.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category for a user.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the user already has a category with
    /// this name, or a database error.
    pub async fn create(
        &self,
        user_id: Uuid,
        draft: CategoryDraft,
    ) -> Result<categories::Model, CategoryError> {
        let txn = self.db.begin().await?;

        Self::ensure_name_free(&txn, user_id, &draft.name, None).await?;

        let now = Utc::now();
        let model = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(draft.name),
            kind: Set(draft.kind.into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = model.insert(&txn).await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Lists a user's categories by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<categories::Model>, DbErr> {
        categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
    }

    /// Gets a category by ID, scoped to the owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or foreign, or a database error.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<categories::Model, CategoryError> {
        categories::Entity::find_by_id(id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    /// Rewrites a category's name and kind.
    ///
    /// Rejected while any transaction in the category falls in a closed
    /// month; a kind flip would silently change those postings' signs.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `DuplicateName`, `PinnedByClosedMonth`, or a
    /// database error.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        draft: CategoryDraft,
    ) -> Result<categories::Model, CategoryError> {
        let txn = self.db.begin().await?;

        let existing = categories::Entity::find_by_id(id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        Self::ensure_name_free(&txn, user_id, &draft.name, Some(id)).await?;
        Self::ensure_unpinned(&txn, user_id, id).await?;

        let mut active: categories::ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.kind = Set(draft.kind.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a category and, through the foreign key cascade, all of
    /// its transactions. Account balances are untouched.
    ///
    /// Rejected while any transaction in the category falls in a closed
    /// month.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `PinnedByClosedMonth`, or a database error.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), CategoryError> {
        let txn = self.db.begin().await?;

        let existing = categories::Entity::find_by_id(id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        Self::ensure_unpinned(&txn, user_id, id).await?;

        existing.delete(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn ensure_name_free<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), CategoryError> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(categories::Column::Id.ne(id));
        }
        if query.one(conn).await?.is_some() {
            return Err(CategoryError::DuplicateName(name.to_owned()));
        }
        Ok(())
    }

    /// Verifies no transaction in the category sits in a closed month.
    async fn ensure_unpinned<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), CategoryError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::CategoryId.eq(category_id))
            .all(conn)
            .await?;
        let closed = PeriodRepository::closed_set_on(conn, user_id).await?;

        LedgerService::ensure_unpinned(rows.into_iter().map(|row| row.posted_on), |date| {
            let period = Period::of(date);
            closed.contains(&(period.year, period.month))
        })
        .map_err(|err| match err {
            CoreLedgerError::PeriodClosed { year, month } => {
                CategoryError::PinnedByClosedMonth { year, month }
            }
            other => CategoryError::Database(DbErr::Custom(other.to_string())),
        })
    }
}
