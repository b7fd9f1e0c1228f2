//! Error types for ledger operations.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised while validating a ledger operation.
///
/// All of these are precondition failures: when one is returned, nothing
/// has been written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The referenced account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// The referenced category does not exist.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Account or category belongs to a different user.
    #[error("Referenced entity does not belong to the current user")]
    OwnerMismatch,

    /// Transaction amount must be non-zero.
    #[error("Transaction amount must not be zero")]
    ZeroAmount,

    /// Transaction amount must be positive; the category supplies the sign.
    #[error("Transaction amount must be positive")]
    NegativeAmount,

    /// The posting date falls in a closed month for this user.
    #[error("Month {month:02}/{year} is closed, no changes allowed")]
    PeriodClosed {
        /// Calendar year of the closed month.
        year: i32,
        /// Calendar month (1-12).
        month: u32,
    },
}
