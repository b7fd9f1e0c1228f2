//! Shared domain types and configuration for Monedero.
//!
//! Everything in this crate is dependency-light and usable from both the
//! pure business-logic crate and the database layer.

pub mod config;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, ReclamationConfig};
pub use types::{AccountKind, OperationKind, SubscriptionTier};
