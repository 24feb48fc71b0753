//! Check-in set domain model.
//!
//! # Responsibility
//! - Hold the calendar dates on which one habit was completed.
//! - Provide the descending date order consumed by streak computation.
//!
//! # Invariants
//! - A date appears at most once; repeated `add` is a no-op.
//! - Dates carry no time-of-day or time-zone component.
//! - Text form is always `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical text format for persisted and serialized check-in dates.
pub const CHECK_IN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses one `YYYY-MM-DD` check-in date.
pub fn parse_check_in_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), CHECK_IN_DATE_FORMAT)
}

/// Formats one check-in date as `YYYY-MM-DD`.
pub fn format_check_in_date(date: NaiveDate) -> String {
    date.format(CHECK_IN_DATE_FORMAT).to_string()
}

/// Set of completion dates owned by exactly one habit.
///
/// Backed by an ordered set, so descending iteration needs no extra sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckInSet {
    dates: BTreeSet<NaiveDate>,
}

impl CheckInSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `date` when absent.
    ///
    /// Returns `true` when the set changed.
    pub fn add(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    /// Removes `date` when present. Removing an absent date is a no-op.
    ///
    /// Returns `true` when the set changed.
    pub fn remove(&mut self, date: NaiveDate) -> bool {
        self.dates.remove(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Most recent check-in date, if any.
    pub fn latest(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Lazily yields dates most recent first.
    pub fn iter_descending(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().rev().copied()
    }

    /// Lazily yields dates oldest first.
    pub fn iter_ascending(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    /// Materializes dates most recent first.
    pub fn to_sorted_descending(&self) -> Vec<NaiveDate> {
        self.iter_descending().collect()
    }
}

impl FromIterator<NaiveDate> for CheckInSet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}
