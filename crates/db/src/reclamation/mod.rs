//! Background reclamation sweeps.
//!
//! Two independent loops run for the lifetime of the daemon:
//! - [`GuestExpirySweep`]: hourly, removes expired guest users and
//!   everything they own.
//! - [`FreeTierRetentionSweep`]: daily at local midnight, purges the
//!   previous calendar month's transactions for free-tier users without
//!   touching account balances.
//!
//! [`ReclamationScheduler`] owns both loops and their shutdown.

pub mod guest_expiry;
pub mod retention;
pub mod scheduler;

pub use guest_expiry::{GuestExpirySweep, GuestSweepOutcome};
pub use retention::{FreeTierRetentionSweep, RetentionOutcome};
pub use scheduler::ReclamationScheduler;
