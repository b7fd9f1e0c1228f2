//! Domain enums shared across the workspace.

use serde::{Deserialize, Serialize};

/// Operation kind of a category.
///
/// Determines the sign a transaction applies to its account balance:
/// income adds the amount, expense subtracts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Money coming in (salary, refunds, ...).
    Income,
    /// Money going out (groceries, rent, ...).
    Expense,
}

impl OperationKind {
    /// Returns true for income categories.
    #[must_use]
    pub fn is_income(self) -> bool {
        self == Self::Income
    }
}

/// Classification of a wallet account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Checking / current account.
    Checking,
    /// Savings account.
    Savings,
    /// Physical cash.
    Cash,
    /// Credit or debit card.
    Card,
}

/// Subscription tier of a user.
///
/// Free users cannot close periods and have last month's transactions
/// purged by the retention sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    /// Free tier.
    Free,
    /// Paid tier.
    Premium,
}

impl SubscriptionTier {
    /// Returns true if this tier may close calendar months.
    #[must_use]
    pub fn can_close_periods(self) -> bool {
        self != Self::Free
    }
}
