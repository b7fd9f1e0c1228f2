//! Repository abstractions for data access.
//!
//! Repositories are the only mutation paths into storage. The ledger
//! repository owns every transaction write and its paired balance write;
//! the period repository owns the closed-month registry.

pub mod account;
pub mod category;
pub mod ledger;
pub mod period;
pub mod user;

pub use account::AccountRepository;
pub use category::CategoryRepository;
pub use ledger::LedgerRepository;
pub use period::PeriodRepository;
pub use user::UserRepository;
