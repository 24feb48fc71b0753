//! Domain model for habits and their check-in ledgers.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - Each habit exclusively owns its `CheckInSet`.

pub mod check_in;
pub mod habit;
