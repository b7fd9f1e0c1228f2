//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access (the only mutation paths)
//! - Database migrations
//! - The two background reclamation sweeps and their scheduler

pub mod entities;
pub mod migration;
pub mod reclamation;
pub mod repositories;

pub use reclamation::{FreeTierRetentionSweep, GuestExpirySweep, ReclamationScheduler};
pub use repositories::{
    AccountRepository, CategoryRepository, LedgerRepository, PeriodRepository, UserRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
