//! Selection and timing rules for the background reclamation sweeps.
//!
//! Two unsupervised sweeps share these rules:
//! - the guest-expiry sweep, which removes whole user subtrees once a
//!   guest's `expires_at` has passed, and
//! - the free-tier retention sweep, which purges last month's
//!   transactions for free users.
//!
//! Both deliberately bypass balance bookkeeping; the storage layer
//! applies each sweep batch in one database transaction.

use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};
use std::time::Duration;

use crate::period::Period;

/// How often the retention sweep recurs after its first midnight-aligned
/// run. The guest sweep's interval comes from configuration instead.
pub const RETENTION_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Returns true if the user is an expired guest.
///
/// Non-guest users and guests without an expiry never qualify.
#[must_use]
pub fn is_expired_guest(
    is_guest: bool,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    is_guest && expires_at.is_some_and(|expiry| expiry <= now)
}

/// Half-open date window `[start, end)` covering the calendar month
/// before `now` (UTC).
#[must_use]
pub fn retention_window(now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
    let current = Period::of(now.date_naive());
    let previous = current.previous();
    (previous.first_day(), current.first_day())
}

/// Delay from `now` until the next local midnight.
///
/// Used to align the retention sweep's first run; returns a full day
/// when called exactly at midnight so the sweep never double-fires.
#[must_use]
pub fn delay_until_midnight(now: DateTime<Local>) -> Duration {
    let next_midnight = now
        .date_naive()
        .succ_opt()
        .expect("date overflow computing next midnight")
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time");

    let delta = next_midnight - now.naive_local();
    // TimeDelta -> std Duration; negative cannot happen, clamp anyway.
    delta
        .max(TimeDelta::zero())
        .to_std()
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_expired_guest() {
        let now = utc(2024, 5, 1, 12);
        assert!(is_expired_guest(true, Some(utc(2024, 5, 1, 11)), now));
        assert!(is_expired_guest(true, Some(now), now)); // boundary counts
        assert!(!is_expired_guest(true, Some(utc(2024, 5, 1, 13)), now));
        assert!(!is_expired_guest(true, None, now));
        // A permanent user with a stray expiry is never reclaimed.
        assert!(!is_expired_guest(false, Some(utc(2024, 5, 1, 11)), now));
    }

    #[test]
    fn test_retention_window_mid_year() {
        let (start, end) = retention_window(utc(2024, 5, 15, 3));
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_retention_window_january_wraps() {
        let (start, end) = retention_window(utc(2024, 1, 2, 0));
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_delay_until_midnight() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 23, 0, 0).unwrap();
        assert_eq!(delay_until_midnight(now), Duration::from_secs(60 * 60));

        let at_midnight = Local.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(
            delay_until_midnight(at_midnight),
            Duration::from_secs(24 * 60 * 60)
        );
    }
}
