//! Core business logic for Monedero.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain rules, validation, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Balance bookkeeping and transaction validation
//! - `period` - Calendar-month closing rules
//! - `reclamation` - Selection and timing rules for the background sweeps

pub mod ledger;
pub mod period;
pub mod reclamation;
