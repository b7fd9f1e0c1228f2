//! The sign rule and balance arithmetic.
//!
//! A transaction's balance effect is `+amount` when its category is income
//! and `-amount` when it is expense. Every mutation reapplies this rule
//! symmetrically: create applies the delta, delete reverses it, update
//! reverses the old delta and applies the new one.

use monedero_shared::OperationKind;
use rust_decimal::Decimal;

/// Signed balance effect of a transaction.
#[must_use]
pub fn signed_delta(kind: OperationKind, amount: Decimal) -> Decimal {
    match kind {
        OperationKind::Income => amount,
        OperationKind::Expense => -amount,
    }
}

/// Applies a transaction's effect to a balance.
#[must_use]
pub fn apply(balance: Decimal, kind: OperationKind, amount: Decimal) -> Decimal {
    balance + signed_delta(kind, amount)
}

/// Reverses a transaction's effect from a balance.
#[must_use]
pub fn reverse(balance: Decimal, kind: OperationKind, amount: Decimal) -> Decimal {
    balance - signed_delta(kind, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_income_adds() {
        assert_eq!(signed_delta(OperationKind::Income, dec!(100)), dec!(100));
        assert_eq!(apply(dec!(0), OperationKind::Income, dec!(100)), dec!(100));
    }

    #[test]
    fn test_expense_subtracts() {
        assert_eq!(signed_delta(OperationKind::Expense, dec!(40)), dec!(-40));
        assert_eq!(apply(dec!(100), OperationKind::Expense, dec!(40)), dec!(60));
    }

    #[test]
    fn test_reverse_undoes_apply() {
        let balance = dec!(250.75);
        let after = apply(balance, OperationKind::Expense, dec!(19.99));
        assert_eq!(reverse(after, OperationKind::Expense, dec!(19.99)), balance);
    }

    #[test]
    fn test_balance_can_go_negative() {
        // Overdraft is allowed; the ledger only tracks, it does not gate.
        assert_eq!(apply(dec!(10), OperationKind::Expense, dec!(25)), dec!(-15));
    }
}
