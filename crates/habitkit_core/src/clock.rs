//! Reference clock abstraction.
//!
//! # Responsibility
//! - Supply the canonical "today" used for check-ins and streaks.
//! - Supply wall-clock timestamps for record metadata.
//!
//! # Invariants
//! - Business logic never reads the system time directly.
//! - One clock instance defines one calendar; no per-call time zones.

use chrono::{Days, Local, NaiveDate, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// Source of the reference date and current timestamp.
pub trait Clock: Send + Sync {
    /// Current calendar date.
    fn today(&self) -> NaiveDate;

    /// Current wall-clock time in Unix epoch milliseconds.
    fn now_epoch_ms(&self) -> i64;
}

/// Clock backed by the host's local calendar and system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_epoch_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Settable clock for deterministic tests and replays.
///
/// `now_epoch_ms` reports midnight UTC of the current date.
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Moves the clock to `today`.
    pub fn set_today(&self, today: NaiveDate) {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner) = today;
    }

    /// Moves the clock forward by `days`. Saturates at the calendar maximum.
    pub fn advance_days(&self, days: u64) {
        let mut guard = self.today.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = guard.checked_add_days(Days::new(days)) {
            *guard = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now_epoch_ms(&self) -> i64 {
        self.today()
            .and_hms_opt(0, 0, 0)
            .map_or(0, |midnight| midnight.and_utc().timestamp_millis())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now_epoch_ms(&self) -> i64 {
        (**self).now_epoch_ms()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now_epoch_ms(&self) -> i64 {
        (**self).now_epoch_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, SystemClock};
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_reports_and_moves_its_date() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).expect("valid test date");
        let clock = FixedClock::new(start);
        assert_eq!(clock.today(), start);
        assert_eq!(clock.now_epoch_ms(), 1_709_078_400_000);

        clock.advance_days(2);
        assert_eq!(
            clock.today(),
            NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid test date")
        );

        clock.set_today(start);
        assert_eq!((&clock).today(), start);
    }

    #[test]
    fn system_clock_timestamp_is_after_2020() {
        assert!(SystemClock.now_epoch_ms() > 1_577_836_800_000);
    }
}
