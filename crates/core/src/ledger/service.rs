//! Ledger service for transaction precondition validation.
//!
//! The service is pure: callers inject lookups for accounts, categories,
//! and the closed-period registry as closures, and get back either a
//! typed error (nothing may be written) or a balance-change plan that the
//! storage layer must apply atomically with the row write.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::balance::signed_delta;
use super::error::LedgerError;
use super::types::{
    AccountRef, BalanceChange, CategoryRef, PostingSnapshot, ResolvedPosting, TransactionInput,
    UpdatePlan,
};
use crate::period::Period;

/// Validates ledger operations and plans their balance effects.
///
/// Contains no storage access of its own; see the repository layer for
/// the atomic write that consumes the plans produced here.
pub struct LedgerService;

impl LedgerService {
    /// Validates a create and resolves its balance effect.
    ///
    /// Checks, in order: the posting month is open, the account and the
    /// category exist and belong to the caller, and the amount is
    /// positive. The category kind is fetched once here and threaded
    /// through in the result.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if any precondition fails.
    pub fn validate_create<A, C, P>(
        input: &TransactionInput,
        account_lookup: A,
        category_lookup: C,
        is_closed: P,
    ) -> Result<ResolvedPosting, LedgerError>
    where
        A: Fn(Uuid) -> Option<AccountRef>,
        C: Fn(Uuid) -> Option<CategoryRef>,
        P: Fn(NaiveDate) -> bool,
    {
        Self::check_open(input.posted_on, &is_closed)?;

        let account = account_lookup(input.account_id)
            .ok_or(LedgerError::AccountNotFound(input.account_id))?;
        let category = category_lookup(input.category_id)
            .ok_or(LedgerError::CategoryNotFound(input.category_id))?;

        if account.owner_id != input.user_id || category.owner_id != input.user_id {
            return Err(LedgerError::OwnerMismatch);
        }

        Self::validate_amount(input.amount)?;

        Ok(ResolvedPosting {
            kind: category.kind,
            delta: signed_delta(category.kind, input.amount),
        })
    }

    /// Validates an update and plans the reversal + application pair.
    ///
    /// Only the **new** posting date is checked against closed periods.
    /// A transaction dated inside a closed month can therefore be edited
    /// to move out of it, but never into one.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if any precondition fails.
    pub fn plan_update<A, C, P>(
        old: &PostingSnapshot,
        input: &TransactionInput,
        account_lookup: A,
        category_lookup: C,
        is_closed: P,
    ) -> Result<UpdatePlan, LedgerError>
    where
        A: Fn(Uuid) -> Option<AccountRef>,
        C: Fn(Uuid) -> Option<CategoryRef>,
        P: Fn(NaiveDate) -> bool,
    {
        Self::check_open(input.posted_on, &is_closed)?;

        let account = account_lookup(input.account_id)
            .ok_or(LedgerError::AccountNotFound(input.account_id))?;
        let category = category_lookup(input.category_id)
            .ok_or(LedgerError::CategoryNotFound(input.category_id))?;

        if account.owner_id != input.user_id || category.owner_id != input.user_id {
            return Err(LedgerError::OwnerMismatch);
        }

        Self::validate_amount(input.amount)?;

        Ok(UpdatePlan {
            reversal: BalanceChange {
                account_id: old.account_id,
                delta: -signed_delta(old.kind, old.amount),
            },
            application: BalanceChange {
                account_id: account.id,
                delta: signed_delta(category.kind, input.amount),
            },
            kind: category.kind,
        })
    }

    /// Validates a delete and plans the reversal.
    ///
    /// The transaction's **existing** posting date must be in an open
    /// month.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PeriodClosed` if the month is closed.
    pub fn plan_delete<P>(
        old: &PostingSnapshot,
        is_closed: P,
    ) -> Result<BalanceChange, LedgerError>
    where
        P: Fn(NaiveDate) -> bool,
    {
        Self::check_open(old.posted_on, &is_closed)?;

        Ok(BalanceChange {
            account_id: old.account_id,
            delta: -signed_delta(old.kind, old.amount),
        })
    }

    /// Rejects edits to an account or category pinned by closed-period
    /// transactions.
    ///
    /// `posting_dates` are the dates of every transaction referencing the
    /// entity; if any falls in a closed month the entity may not be
    /// edited or deleted.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PeriodClosed` naming the first closed month
    /// found.
    pub fn ensure_unpinned<I, P>(posting_dates: I, is_closed: P) -> Result<(), LedgerError>
    where
        I: IntoIterator<Item = NaiveDate>,
        P: Fn(NaiveDate) -> bool,
    {
        for date in posting_dates {
            Self::check_open(date, &is_closed)?;
        }
        Ok(())
    }

    fn check_open<P>(date: NaiveDate, is_closed: &P) -> Result<(), LedgerError>
    where
        P: Fn(NaiveDate) -> bool,
    {
        if is_closed(date) {
            let period = Period::of(date);
            return Err(LedgerError::PeriodClosed {
                year: period.year,
                month: period.month,
            });
        }
        Ok(())
    }

    fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
        if amount == Decimal::ZERO {
            return Err(LedgerError::ZeroAmount);
        }
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monedero_shared::OperationKind;
    use rust_decimal_macros::dec;

    fn owner() -> Uuid {
        Uuid::from_u128(1)
    }

    fn make_input(amount: Decimal) -> TransactionInput {
        TransactionInput {
            user_id: owner(),
            posted_on: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            amount,
            account_id: Uuid::from_u128(10),
            category_id: Uuid::from_u128(20),
            note: None,
        }
    }

    fn own_account(id: Uuid) -> Option<AccountRef> {
        Some(AccountRef {
            id,
            owner_id: owner(),
        })
    }

    fn own_income_category(id: Uuid) -> Option<CategoryRef> {
        Some(CategoryRef {
            id,
            owner_id: owner(),
            kind: OperationKind::Income,
        })
    }

    fn all_open(_date: NaiveDate) -> bool {
        false
    }

    #[test]
    fn test_create_resolves_income_delta() {
        let input = make_input(dec!(100));
        let posting =
            LedgerService::validate_create(&input, own_account, own_income_category, all_open)
                .unwrap();
        assert_eq!(posting.kind, OperationKind::Income);
        assert_eq!(posting.delta, dec!(100));
    }

    #[test]
    fn test_create_resolves_expense_delta() {
        let input = make_input(dec!(35.50));
        let expense = |id| {
            Some(CategoryRef {
                id,
                owner_id: owner(),
                kind: OperationKind::Expense,
            })
        };
        let posting =
            LedgerService::validate_create(&input, own_account, expense, all_open).unwrap();
        assert_eq!(posting.delta, dec!(-35.50));
    }

    #[test]
    fn test_create_missing_account() {
        let input = make_input(dec!(100));
        let result =
            LedgerService::validate_create(&input, |_| None, own_income_category, all_open);
        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
    }

    #[test]
    fn test_create_missing_category() {
        let input = make_input(dec!(100));
        let result = LedgerService::validate_create(&input, own_account, |_| None, all_open);
        assert!(matches!(result, Err(LedgerError::CategoryNotFound(_))));
    }

    #[test]
    fn test_create_cross_owner_account() {
        let input = make_input(dec!(100));
        let foreign = |id| {
            Some(AccountRef {
                id,
                owner_id: Uuid::from_u128(99),
            })
        };
        let result =
            LedgerService::validate_create(&input, foreign, own_income_category, all_open);
        assert_eq!(result, Err(LedgerError::OwnerMismatch));
    }

    #[test]
    fn test_create_zero_and_negative_amounts() {
        let zero = make_input(dec!(0));
        assert_eq!(
            LedgerService::validate_create(&zero, own_account, own_income_category, all_open),
            Err(LedgerError::ZeroAmount)
        );
        let negative = make_input(dec!(-5));
        assert_eq!(
            LedgerService::validate_create(&negative, own_account, own_income_category, all_open),
            Err(LedgerError::NegativeAmount)
        );
    }

    #[test]
    fn test_create_rejected_in_closed_month() {
        let input = make_input(dec!(100));
        let closed = |date: NaiveDate| date.format("%Y-%m").to_string() == "2024-04";
        let result =
            LedgerService::validate_create(&input, own_account, own_income_category, closed);
        assert_eq!(
            result,
            Err(LedgerError::PeriodClosed {
                year: 2024,
                month: 4
            })
        );
    }

    #[test]
    fn test_update_plan_reverses_old_and_applies_new() {
        let old = PostingSnapshot {
            account_id: Uuid::from_u128(10),
            kind: OperationKind::Income,
            amount: dec!(100),
            posted_on: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        };
        let mut input = make_input(dec!(150));
        input.account_id = Uuid::from_u128(11); // move to another account

        let plan =
            LedgerService::plan_update(&old, &input, own_account, own_income_category, all_open)
                .unwrap();
        assert_eq!(plan.reversal.account_id, Uuid::from_u128(10));
        assert_eq!(plan.reversal.delta, dec!(-100));
        assert_eq!(plan.application.account_id, Uuid::from_u128(11));
        assert_eq!(plan.application.delta, dec!(150));
    }

    #[test]
    fn test_update_checks_only_new_date() {
        // The old posting sits in a closed month; moving it out succeeds.
        let old = PostingSnapshot {
            account_id: Uuid::from_u128(10),
            kind: OperationKind::Income,
            amount: dec!(100),
            posted_on: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        };
        let input = make_input(dec!(100)); // dated 2024-04-10
        let march_closed = |date: NaiveDate| {
            let p = Period::of(date);
            p.year == 2024 && p.month == 3
        };

        let result =
            LedgerService::plan_update(&old, &input, own_account, own_income_category, march_closed);
        assert!(result.is_ok());
    }

    #[test]
    fn test_update_rejected_when_new_date_closed() {
        let old = PostingSnapshot {
            account_id: Uuid::from_u128(10),
            kind: OperationKind::Income,
            amount: dec!(100),
            posted_on: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        };
        let input = make_input(dec!(100)); // dated 2024-04-10
        let april_closed = |date: NaiveDate| {
            let p = Period::of(date);
            p.year == 2024 && p.month == 4
        };

        let result =
            LedgerService::plan_update(&old, &input, own_account, own_income_category, april_closed);
        assert_eq!(
            result.err(),
            Some(LedgerError::PeriodClosed {
                year: 2024,
                month: 4
            })
        );
    }

    #[test]
    fn test_delete_reverses_expense() {
        let old = PostingSnapshot {
            account_id: Uuid::from_u128(10),
            kind: OperationKind::Expense,
            amount: dec!(40),
            posted_on: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        };
        let change = LedgerService::plan_delete(&old, all_open).unwrap();
        assert_eq!(change.delta, dec!(40)); // undoing an expense adds back
    }

    #[test]
    fn test_delete_rejected_in_closed_month() {
        let old = PostingSnapshot {
            account_id: Uuid::from_u128(10),
            kind: OperationKind::Expense,
            amount: dec!(40),
            posted_on: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        };
        let result = LedgerService::plan_delete(&old, |_| true);
        assert!(matches!(result, Err(LedgerError::PeriodClosed { .. })));
    }

    #[test]
    fn test_ensure_unpinned() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        ];
        assert!(LedgerService::ensure_unpinned(dates.clone(), all_open).is_ok());

        let march_closed = |date: NaiveDate| Period::of(date).month == 3;
        let result = LedgerService::ensure_unpinned(dates, march_closed);
        assert_eq!(
            result,
            Err(LedgerError::PeriodClosed {
                year: 2024,
                month: 3
            })
        );
    }
}
