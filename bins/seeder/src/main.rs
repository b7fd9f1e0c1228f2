//! Database seeder for Monedero development and testing.
//!
//! Seeds a premium test user with accounts, categories, and a handful of
//! transactions, plus an already-expired guest so the guest sweep has
//! something to reclaim on its first pass.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use monedero_core::ledger::TransactionInput;
use monedero_db::repositories::account::AccountDraft;
use monedero_db::repositories::category::CategoryDraft;
use monedero_db::{AccountRepository, CategoryRepository, LedgerRepository, UserRepository};
use monedero_shared::{AccountKind, OperationKind, SubscriptionTier};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = monedero_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let users = UserRepository::new(db.clone());
    let accounts = AccountRepository::new(db.clone());
    let categories = CategoryRepository::new(db.clone());
    let ledger = LedgerRepository::new(db);

    println!("Seeding test user...");
    if users
        .find_by_email("test@monedero.dev")
        .await
        .expect("Failed to query users")
        .is_some()
    {
        println!("  Test user already exists, skipping...");
        return;
    }

    let user = users
        .create("test@monedero.dev", "Test User", SubscriptionTier::Premium)
        .await
        .expect("Failed to create test user");

    println!("Seeding expired guest...");
    users
        .create_guest(
            "guest@monedero.dev",
            "Expired Guest",
            Utc::now() - Duration::hours(1),
        )
        .await
        .expect("Failed to create guest");

    println!("Seeding accounts...");
    let checking = accounts
        .create(
            user.id,
            AccountDraft {
                name: "Main Checking".to_string(),
                kind: AccountKind::Checking,
                balance: dec!(0),
                description: Some("Primary account".to_string()),
            },
        )
        .await
        .expect("Failed to create account");

    println!("Seeding categories...");
    let salary = categories
        .create(
            user.id,
            CategoryDraft {
                name: "Salary".to_string(),
                kind: OperationKind::Income,
            },
        )
        .await
        .expect("Failed to create category");
    let groceries = categories
        .create(
            user.id,
            CategoryDraft {
                name: "Groceries".to_string(),
                kind: OperationKind::Expense,
            },
        )
        .await
        .expect("Failed to create category");

    println!("Seeding transactions...");
    let today = Utc::now().date_naive();
    seed_transaction(&ledger, user.id, checking.id, salary.id, today, dec!(2500)).await;
    seed_transaction(&ledger, user.id, checking.id, groceries.id, today, dec!(75.40)).await;

    println!("Seeding complete!");
}

async fn seed_transaction(
    ledger: &LedgerRepository,
    user_id: Uuid,
    account_id: Uuid,
    category_id: Uuid,
    posted_on: NaiveDate,
    amount: rust_decimal::Decimal,
) {
    ledger
        .create(TransactionInput {
            user_id,
            posted_on,
            amount,
            account_id,
            category_id,
            note: None,
        })
        .await
        .expect("Failed to create transaction");
}
