//! Shared fixtures for the db integration tests.
//!
//! Each test gets its own in-memory SQLite database with the real
//! migrations applied, so tests are independent and need no running
//! server or external database.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use monedero_core::ledger::TransactionInput;
use monedero_db::entities::{accounts, categories, transactions, users};
use monedero_db::migration::{Migrator, MigratorTrait};
use monedero_db::repositories::account::AccountDraft;
use monedero_db::repositories::category::CategoryDraft;
use monedero_db::{AccountRepository, CategoryRepository, LedgerRepository, UserRepository};
use monedero_shared::{AccountKind, OperationKind, SubscriptionTier};

/// Fresh database with migrations applied.
pub async fn test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// A user with one account and one category of each kind.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub user: users::Model,
    pub account: accounts::Model,
    pub income: categories::Model,
    pub expense: categories::Model,
}

impl Fixture {
    pub fn ledger(&self) -> LedgerRepository {
        LedgerRepository::new(self.db.clone())
    }

    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.db.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.db.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    /// Posts a transaction through the ledger repository.
    pub async fn post(
        &self,
        category: &categories::Model,
        posted_on: NaiveDate,
        amount: Decimal,
    ) -> transactions::Model {
        self.ledger()
            .create(TransactionInput {
                user_id: self.user.id,
                posted_on,
                amount,
                account_id: self.account.id,
                category_id: category.id,
                note: None,
            })
            .await
            .expect("Failed to create transaction")
    }

    /// Reads the account balance back from storage.
    pub async fn balance(&self) -> Decimal {
        balance_of(&self.db, self.account.id).await
    }
}

pub async fn fixture() -> Fixture {
    fixture_with_tier(SubscriptionTier::Premium).await
}

pub async fn fixture_with_tier(tier: SubscriptionTier) -> Fixture {
    let db = test_db().await;
    fixture_on(db, tier).await
}

/// Builds a fixture on an existing connection, so tests can host several
/// users in one database.
pub async fn fixture_on(db: DatabaseConnection, tier: SubscriptionTier) -> Fixture {
    let email = format!("{}@monedero.test", Uuid::new_v4());
    let user = UserRepository::new(db.clone())
        .create(&email, "Test User", tier)
        .await
        .expect("Failed to create user");

    let account = AccountRepository::new(db.clone())
        .create(
            user.id,
            AccountDraft {
                name: "Checking".to_string(),
                kind: AccountKind::Checking,
                balance: Decimal::ZERO,
                description: None,
            },
        )
        .await
        .expect("Failed to create account");

    let income = CategoryRepository::new(db.clone())
        .create(
            user.id,
            CategoryDraft {
                name: "Salary".to_string(),
                kind: OperationKind::Income,
            },
        )
        .await
        .expect("Failed to create income category");

    let expense = CategoryRepository::new(db.clone())
        .create(
            user.id,
            CategoryDraft {
                name: "Groceries".to_string(),
                kind: OperationKind::Expense,
            },
        )
        .await
        .expect("Failed to create expense category");

    Fixture {
        db,
        user,
        account,
        income,
        expense,
    }
}

pub async fn balance_of(db: &DatabaseConnection, account_id: Uuid) -> Decimal {
    accounts::Entity::find_by_id(account_id)
        .one(db)
        .await
        .expect("Failed to query account")
        .expect("Account missing")
        .balance
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
