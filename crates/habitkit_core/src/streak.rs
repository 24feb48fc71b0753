//! Streak computation over check-in sets.
//!
//! # Responsibility
//! - Derive the current consecutive-day streak ending at a reference date.
//! - Derive the longest historical run shown on habit detail views.
//!
//! # Invariants
//! - All functions are pure: same set and same `today` give the same result.
//! - The current streak only counts a contiguous run that includes `today`.
//! - Streak values are projections and are never persisted.

use crate::model::check_in::CheckInSet;
use chrono::{Days, NaiveDate};

/// Returns the current consecutive-day streak ending at `today`.
///
/// Walks dates most recent first and compares the `i`-th date with
/// `today - i days`. The walk stops at the first mismatch, so a gap, a
/// missing check-in for `today`, or a future-dated entry ends the count.
pub fn compute_streak(check_ins: &CheckInSet, today: NaiveDate) -> u32 {
    if check_ins.is_empty() {
        return 0;
    }

    let mut streak = 0;
    for (offset, date) in check_ins.iter_descending().enumerate() {
        let Some(expected) = today.checked_sub_days(Days::new(offset as u64)) else {
            break;
        };
        if date != expected {
            break;
        }
        streak += 1;
    }

    streak
}

/// Returns the longest run of consecutive dates anywhere in the set.
pub fn longest_streak(check_ins: &CheckInSet) -> u32 {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in check_ins.iter_ascending() {
        current = match previous.and_then(|prev| prev.succ_opt()) {
            Some(next) if next == date => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(date);
    }

    longest
}
