//! Balance bookkeeping and transaction validation.
//!
//! This module implements the rules that keep every account balance equal
//! to the signed sum of the transactions posted against it:
//! - The sign rule (income adds, expense subtracts)
//! - Precondition validation for create/update/delete
//! - Balance change planning (reversal + application)

pub mod balance;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::{apply, reverse, signed_delta};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    AccountRef, BalanceChange, CategoryRef, PostingSnapshot, ResolvedPosting, TransactionInput,
    UpdatePlan,
};
