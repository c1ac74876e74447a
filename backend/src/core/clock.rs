//! Injectable time source
//!
//! All "today" comparisons in the engine (grace periods, delegation
//! validity windows, penalty accrual) go through the `Clock` trait.
//! Production uses `SystemClock`; tests pin time with `FixedClock`.
//!
//! CRITICAL: no engine code may call `chrono::Local::now()` directly.

use chrono::NaiveDate;

/// Source of the current calendar date.
pub trait Clock {
    /// Current date as seen by the engine.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time source for production use.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Fixed time source for deterministic tests.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tontine_ledger_core_rs::core::clock::{Clock, FixedClock};
///
/// let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
/// assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    /// Create a clock frozen at the given date.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// A copy of this clock advanced by `days`.
    pub fn advanced_by(&self, days: i64) -> Self {
        Self {
            today: self.today + chrono::Duration::days(days),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_clock_is_frozen() {
        let clock = FixedClock::new(date(2026, 1, 15));
        assert_eq!(clock.today(), date(2026, 1, 15));
        assert_eq!(clock.today(), date(2026, 1, 15));
    }

    #[test]
    fn test_advanced_by_crosses_month_boundary() {
        let clock = FixedClock::new(date(2026, 1, 30));
        assert_eq!(clock.advanced_by(3).today(), date(2026, 2, 2));
    }
}
