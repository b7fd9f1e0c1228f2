//! Integration tests for account and category repositories, in
//! particular the closed-month pinning guards.

mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use common::{balance_of, date, fixture};
use monedero_db::PeriodRepository;
use monedero_db::entities::transactions;
use monedero_db::repositories::account::{AccountDraft, AccountError};
use monedero_db::repositories::category::{CategoryDraft, CategoryError};
use monedero_shared::{AccountKind, OperationKind};

fn draft(name: &str, balance: rust_decimal::Decimal) -> AccountDraft {
    AccountDraft {
        name: name.to_string(),
        kind: AccountKind::Savings,
        balance,
        description: None,
    }
}

#[tokio::test]
async fn test_account_crud_round_trip() {
    let fx = fixture().await;

    let created = fx
        .accounts()
        .create(fx.user.id, draft("Vacation", dec!(500)))
        .await
        .expect("create failed");
    assert_eq!(created.balance, dec!(500));

    let updated = fx
        .accounts()
        .update(fx.user.id, created.id, draft("Vacation Fund", dec!(750)))
        .await
        .expect("update failed");
    assert_eq!(updated.name, "Vacation Fund");
    assert_eq!(updated.balance, dec!(750));

    let listed = fx.accounts().list(fx.user.id).await.expect("list failed");
    assert_eq!(listed.len(), 2); // fixture account + this one

    fx.accounts()
        .delete(fx.user.id, created.id)
        .await
        .expect("delete failed");
    let result = fx.accounts().get(fx.user.id, created.id).await;
    assert!(matches!(result, Err(AccountError::NotFound(_))));
}

#[tokio::test]
async fn test_account_pinned_by_closed_month() {
    let fx = fixture().await;
    let periods = PeriodRepository::new(fx.db.clone());

    fx.post(&fx.income, date(2024, 4, 10), dec!(100)).await;
    periods
        .close(fx.user.id, 2024, 4)
        .await
        .expect("close failed");

    let update = fx
        .accounts()
        .update(fx.user.id, fx.account.id, draft("Renamed", dec!(0)))
        .await;
    assert!(matches!(
        update,
        Err(AccountError::PinnedByClosedMonth {
            year: 2024,
            month: 4
        })
    ));

    let delete = fx.accounts().delete(fx.user.id, fx.account.id).await;
    assert!(matches!(
        delete,
        Err(AccountError::PinnedByClosedMonth { .. })
    ));

    // Untouched by the rejected attempts.
    assert_eq!(fx.balance().await, dec!(100));
}

#[tokio::test]
async fn test_account_delete_removes_its_transactions() {
    let fx = fixture().await;
    fx.post(&fx.income, date(2024, 4, 10), dec!(100)).await;
    fx.post(&fx.expense, date(2024, 4, 11), dec!(30)).await;

    fx.accounts()
        .delete(fx.user.id, fx.account.id)
        .await
        .expect("delete failed");

    let remaining = transactions::Entity::find()
        .filter(transactions::Column::UserId.eq(fx.user.id))
        .all(&fx.db)
        .await
        .expect("query failed");
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn test_category_duplicate_name_rejected() {
    let fx = fixture().await;

    let dup = fx
        .categories()
        .create(
            fx.user.id,
            CategoryDraft {
                name: "Salary".to_string(),
                kind: OperationKind::Income,
            },
        )
        .await;
    assert!(matches!(dup, Err(CategoryError::DuplicateName(_))));

    // Renaming one category onto another is rejected the same way.
    let rename = fx
        .categories()
        .update(
            fx.user.id,
            fx.expense.id,
            CategoryDraft {
                name: "Salary".to_string(),
                kind: OperationKind::Expense,
            },
        )
        .await;
    assert!(matches!(rename, Err(CategoryError::DuplicateName(_))));
}

#[tokio::test]
async fn test_category_pinned_by_closed_month() {
    let fx = fixture().await;
    let periods = PeriodRepository::new(fx.db.clone());

    fx.post(&fx.expense, date(2024, 4, 10), dec!(40)).await;
    periods
        .close(fx.user.id, 2024, 4)
        .await
        .expect("close failed");

    // A kind flip would change the sign of the closed posting.
    let update = fx
        .categories()
        .update(
            fx.user.id,
            fx.expense.id,
            CategoryDraft {
                name: "Groceries".to_string(),
                kind: OperationKind::Income,
            },
        )
        .await;
    assert!(matches!(
        update,
        Err(CategoryError::PinnedByClosedMonth {
            year: 2024,
            month: 4
        })
    ));

    let delete = fx.categories().delete(fx.user.id, fx.expense.id).await;
    assert!(matches!(
        delete,
        Err(CategoryError::PinnedByClosedMonth { .. })
    ));
}

#[tokio::test]
async fn test_category_delete_removes_transactions_but_not_balance() {
    let fx = fixture().await;
    fx.post(&fx.expense, date(2024, 4, 10), dec!(40)).await;
    assert_eq!(fx.balance().await, dec!(-40));

    fx.categories()
        .delete(fx.user.id, fx.expense.id)
        .await
        .expect("delete failed");

    let remaining = transactions::Entity::find()
        .filter(transactions::Column::UserId.eq(fx.user.id))
        .all(&fx.db)
        .await
        .expect("query failed");
    assert!(remaining.is_empty());

    // Category removal is bulk cleanup, not a ledger reversal.
    assert_eq!(balance_of(&fx.db, fx.account.id).await, dec!(-40));
}
