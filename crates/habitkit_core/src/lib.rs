//! Core domain logic for habitkit.
//! This crate is the single source of truth for check-in and streak invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;
pub mod streak;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, HabitConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::check_in::{format_check_in_date, parse_check_in_date, CheckInSet};
pub use model::habit::{Habit, HabitId, HabitUpdate, HabitValidationError, NewHabit};
pub use repo::habit_repo::{HabitRepository, RepoError, RepoResult, SqliteHabitRepository};
pub use service::habit_service::{
    HabitService, HabitServiceError, HabitServiceResult, HabitView, PROGRESS_TARGET_DAYS,
};
pub use stats::{DayActivity, HabitStatistics, TopHabit};
pub use streak::{compute_streak, longest_streak};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
