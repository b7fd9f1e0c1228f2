//! Property tests for the ledger service and the sign rule.

use chrono::NaiveDate;
use monedero_shared::OperationKind;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::balance::{apply, reverse, signed_delta};
use super::service::LedgerService;
use super::types::{AccountRef, CategoryRef, PostingSnapshot, TransactionInput};

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn kind_strategy() -> impl Strategy<Value = OperationKind> {
    prop_oneof![Just(OperationKind::Income), Just(OperationKind::Expense)]
}

fn owner() -> Uuid {
    Uuid::from_u128(1)
}

fn input_with(amount: Decimal) -> TransactionInput {
    TransactionInput {
        user_id: owner(),
        posted_on: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        amount,
        account_id: Uuid::from_u128(10),
        category_id: Uuid::from_u128(20),
        note: None,
    }
}

fn account_lookup(id: Uuid) -> Option<AccountRef> {
    Some(AccountRef {
        id,
        owner_id: owner(),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Reversing a delta always restores the original balance.
    #[test]
    fn prop_apply_then_reverse_is_identity(
        balance in amount_strategy(),
        amount in amount_strategy(),
        kind in kind_strategy(),
    ) {
        let moved = apply(balance, kind, amount);
        prop_assert_eq!(reverse(moved, kind, amount), balance);
    }

    /// Income and expense deltas of the same magnitude cancel.
    #[test]
    fn prop_income_expense_symmetry(amount in amount_strategy()) {
        let up = signed_delta(OperationKind::Income, amount);
        let down = signed_delta(OperationKind::Expense, amount);
        prop_assert_eq!(up + down, Decimal::ZERO);
    }

    /// A create followed by its delete has zero net balance effect.
    #[test]
    fn prop_create_then_delete_nets_zero(
        amount in amount_strategy(),
        kind in kind_strategy(),
    ) {
        let input = input_with(amount);
        let category_lookup = |id| Some(CategoryRef { id, owner_id: owner(), kind });

        let posting = LedgerService::validate_create(
            &input, account_lookup, category_lookup, |_| false,
        ).unwrap();

        let snapshot = PostingSnapshot {
            account_id: input.account_id,
            kind: posting.kind,
            amount: input.amount,
            posted_on: input.posted_on,
        };
        let reversal = LedgerService::plan_delete(&snapshot, |_| false).unwrap();

        prop_assert_eq!(posting.delta + reversal.delta, Decimal::ZERO);
    }

    /// An update plan's net effect equals new delta minus old delta.
    #[test]
    fn prop_update_net_effect(
        old_amount in amount_strategy(),
        new_amount in amount_strategy(),
        old_kind in kind_strategy(),
        new_kind in kind_strategy(),
    ) {
        let old = PostingSnapshot {
            account_id: Uuid::from_u128(10),
            kind: old_kind,
            amount: old_amount,
            posted_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        let input = input_with(new_amount);
        let category_lookup = |id| Some(CategoryRef { id, owner_id: owner(), kind: new_kind });

        let plan = LedgerService::plan_update(
            &old, &input, account_lookup, category_lookup, |_| false,
        ).unwrap();

        let net = plan.reversal.delta + plan.application.delta;
        let expected = signed_delta(new_kind, new_amount) - signed_delta(old_kind, old_amount);
        prop_assert_eq!(net, expected);
    }

    /// Non-positive amounts never validate.
    #[test]
    fn prop_non_positive_amount_rejected(n in 0i64..1_000_000i64) {
        let input = input_with(-Decimal::new(n, 2));
        let category_lookup = |id| Some(CategoryRef {
            id,
            owner_id: owner(),
            kind: OperationKind::Income,
        });
        let result = LedgerService::validate_create(
            &input, account_lookup, category_lookup, |_| false,
        );
        prop_assert!(result.is_err());
    }
}
