//! Domain types for ledger operations.

use chrono::NaiveDate;
use monedero_shared::OperationKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input for creating or rewriting a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Posting date (day granularity, time-of-day discarded upstream).
    pub posted_on: NaiveDate,
    /// Unsigned magnitude; the category kind supplies the sign.
    pub amount: Decimal,
    /// Referenced account.
    pub account_id: Uuid,
    /// Referenced category.
    pub category_id: Uuid,
    /// Free-text note.
    pub note: Option<String>,
}

/// Ownership info about an account, as seen by the validator.
#[derive(Debug, Clone, Copy)]
pub struct AccountRef {
    /// The account ID.
    pub id: Uuid,
    /// The user who owns the account.
    pub owner_id: Uuid,
}

/// Ownership and kind info about a category, as seen by the validator.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRef {
    /// The category ID.
    pub id: Uuid,
    /// The user who owns the category.
    pub owner_id: Uuid,
    /// Income or expense; determines the balance sign.
    pub kind: OperationKind,
}

/// The persisted state of an existing transaction, read before a mutation.
#[derive(Debug, Clone, Copy)]
pub struct PostingSnapshot {
    /// Account the transaction currently points at.
    pub account_id: Uuid,
    /// Kind of the category it currently references.
    pub kind: OperationKind,
    /// Current magnitude.
    pub amount: Decimal,
    /// Current posting date.
    pub posted_on: NaiveDate,
}

/// Outcome of validating a create: the kind fetched once and the signed
/// delta to apply to the account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPosting {
    /// Category kind, threaded through so it is never re-queried.
    pub kind: OperationKind,
    /// Signed balance effect.
    pub delta: Decimal,
}

/// One signed balance adjustment against one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChange {
    /// Account whose balance moves.
    pub account_id: Uuid,
    /// Signed amount to add to the balance.
    pub delta: Decimal,
}

/// Plan for an update: undo the old effect, then apply the new one.
///
/// The two changes may target different accounts when the update moves the
/// transaction between accounts.
#[derive(Debug, Clone, Copy)]
pub struct UpdatePlan {
    /// Reversal of the old signed delta on the old account.
    pub reversal: BalanceChange,
    /// Application of the new signed delta on the new account.
    pub application: BalanceChange,
    /// Kind of the new category.
    pub kind: OperationKind,
}
