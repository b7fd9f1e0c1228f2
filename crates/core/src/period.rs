//! Calendar-month closing rules.
//!
//! A closed period is a `(user, year, month)` tuple. Once recorded, no
//! transaction dated inside that month may be created, edited, or
//! deleted for that user. Closing is permanent: there is no reopen.

use chrono::{Datelike, NaiveDate};
use monedero_shared::SubscriptionTier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A calendar month, the unit of closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl Period {
    /// The period a date belongs to.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns true if the date falls inside this period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The month before this one, wrapping over year boundaries.
    #[must_use]
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after this one, wrapping over year boundaries.
    #[must_use]
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// First day of the month.
    ///
    /// # Panics
    ///
    /// Panics if the period holds an invalid month; construct through
    /// [`Period::of`] or validate with [`validate_close`] first.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("period month must be in 1..=12")
    }
}

/// Errors raised while closing a period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// The month is already closed for this user.
    #[error("Month {month:02}/{year} is already closed")]
    AlreadyClosed {
        /// Calendar year.
        year: i32,
        /// Calendar month (1-12).
        month: u32,
    },

    /// Closing months is gated behind a paid tier.
    #[error("Free tier users cannot close months")]
    TierNotAllowed,

    /// Month outside 1-12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),
}

/// Validates a close request against the tier gate and duplicate gate.
///
/// # Errors
///
/// Returns `TierNotAllowed` for free users, `InvalidMonth` for a month
/// outside 1-12, and `AlreadyClosed` when the tuple exists.
pub fn validate_close(
    tier: SubscriptionTier,
    year: i32,
    month: u32,
    already_closed: bool,
) -> Result<(), PeriodError> {
    if !tier.can_close_periods() {
        return Err(PeriodError::TierNotAllowed);
    }
    if !(1..=12).contains(&month) {
        return Err(PeriodError::InvalidMonth(month));
    }
    if already_closed {
        return Err(PeriodError::AlreadyClosed { year, month });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_of_and_contains() {
        let period = Period::of(date(2024, 3, 15));
        assert_eq!(period, Period { year: 2024, month: 3 });
        assert!(period.contains(date(2024, 3, 1)));
        assert!(period.contains(date(2024, 3, 31)));
        assert!(!period.contains(date(2024, 4, 1)));
        assert!(!period.contains(date(2023, 3, 15)));
    }

    #[test]
    fn test_previous_wraps_january() {
        let january = Period { year: 2024, month: 1 };
        assert_eq!(january.previous(), Period { year: 2023, month: 12 });
        let june = Period { year: 2024, month: 6 };
        assert_eq!(june.previous(), Period { year: 2024, month: 5 });
    }

    #[test]
    fn test_next_wraps_december() {
        let december = Period { year: 2023, month: 12 };
        assert_eq!(december.next(), Period { year: 2024, month: 1 });
    }

    #[test]
    fn test_first_day() {
        let period = Period { year: 2024, month: 2 };
        assert_eq!(period.first_day(), date(2024, 2, 1));
    }

    #[test]
    fn test_close_tier_gate() {
        assert_eq!(
            validate_close(SubscriptionTier::Free, 2024, 3, false),
            Err(PeriodError::TierNotAllowed)
        );
        assert!(validate_close(SubscriptionTier::Premium, 2024, 3, false).is_ok());
    }

    #[test]
    fn test_close_duplicate_gate() {
        assert_eq!(
            validate_close(SubscriptionTier::Premium, 2024, 3, true),
            Err(PeriodError::AlreadyClosed { year: 2024, month: 3 })
        );
    }

    #[test]
    fn test_close_invalid_month() {
        assert_eq!(
            validate_close(SubscriptionTier::Premium, 2024, 13, false),
            Err(PeriodError::InvalidMonth(13))
        );
        assert_eq!(
            validate_close(SubscriptionTier::Premium, 2024, 0, false),
            Err(PeriodError::InvalidMonth(0))
        );
    }
}
