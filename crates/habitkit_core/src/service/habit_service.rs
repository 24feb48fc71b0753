//! Habit use-case service.
//!
//! # Responsibility
//! - Provide create/read/update/delete and check-in entry points.
//! - Attach derived streak values to every habit returned to callers.
//!
//! # Invariants
//! - "Today" always comes from the injected clock.
//! - Streaks are recomputed on each read and never stored.
//! - Undo removes exactly today's check-in, never another date.
//! - Service APIs never bypass repository validation/persistence contracts.

use crate::clock::Clock;
use crate::model::habit::{Habit, HabitId, HabitUpdate, HabitValidationError, NewHabit};
use crate::repo::habit_repo::{HabitRepository, RepoError};
use crate::stats::{rounded_percent, HabitStatistics};
use crate::streak::{compute_streak, longest_streak};
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use thiserror::Error;

/// Service error for habit use-cases.
#[derive(Debug, Error)]
pub enum HabitServiceError {
    #[error("habit not found: {0}")]
    HabitNotFound(HabitId),
    #[error("update contains no fields")]
    EmptyUpdate,
    #[error(transparent)]
    Validation(HabitValidationError),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for HabitServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::HabitNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type HabitServiceResult<T> = Result<T, HabitServiceError>;

/// Check-in count at which `HabitView::progress` reaches 100.
pub const PROGRESS_TARGET_DAYS: usize = 30;

/// Habit plus values derived at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitView {
    #[serde(flatten)]
    pub habit: Habit,
    pub streak: u32,
    /// Longest run of consecutive days anywhere in the history.
    pub longest_streak: u32,
    pub checked_in_today: bool,
    /// Total check-ins as a percentage of `PROGRESS_TARGET_DAYS`, capped at 100.
    pub progress: u32,
}

impl HabitView {
    pub fn new(habit: Habit, today: NaiveDate) -> Self {
        let total = habit.check_ins.len();
        Self {
            streak: compute_streak(&habit.check_ins, today),
            longest_streak: longest_streak(&habit.check_ins),
            checked_in_today: habit.check_ins.contains(today),
            progress: rounded_percent(total.min(PROGRESS_TARGET_DAYS), PROGRESS_TARGET_DAYS),
            habit,
        }
    }
}

/// Use-case service over a habit repository and a reference clock.
pub struct HabitService<R: HabitRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: HabitRepository, C: Clock> HabitService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates a habit with an empty check-in set.
    pub fn create_habit(&self, input: NewHabit) -> HabitServiceResult<HabitView> {
        let habit = Habit::from_new(input, self.clock.now_epoch_ms());
        let id = self.repo.create_habit(&habit)?;
        info!("event=habit_create module=service status=ok habit_id={id}");
        Ok(self.view(habit))
    }

    pub fn get_habit(&self, id: HabitId) -> HabitServiceResult<HabitView> {
        Ok(self.view(self.load(id)?))
    }

    /// Lists all habits in creation order.
    pub fn list_habits(&self) -> HabitServiceResult<Vec<HabitView>> {
        let today = self.clock.today();
        let habits = self.repo.list_habits()?;
        Ok(habits
            .into_iter()
            .map(|habit| HabitView::new(habit, today))
            .collect())
    }

    /// Applies a validated partial metadata update.
    ///
    /// # Errors
    /// - `EmptyUpdate` when no field is set.
    /// - `Validation` when the updated habit breaks metadata invariants.
    pub fn update_habit(
        &self,
        id: HabitId,
        update: &HabitUpdate,
    ) -> HabitServiceResult<HabitView> {
        if update.is_empty() {
            return Err(HabitServiceError::EmptyUpdate);
        }

        let mut habit = self.load(id)?;
        habit.apply_update(update, self.clock.now_epoch_ms());
        self.repo.update_habit(&habit)?;
        info!("event=habit_update module=service status=ok habit_id={id}");
        Ok(self.view(habit))
    }

    /// Deletes a habit together with its check-ins.
    pub fn delete_habit(&self, id: HabitId) -> HabitServiceResult<()> {
        self.repo.delete_habit(id)?;
        info!("event=habit_delete module=service status=ok habit_id={id}");
        Ok(())
    }

    /// Records today's check-in. Repeating it on the same day changes nothing.
    pub fn check_in(&self, id: HabitId) -> HabitServiceResult<HabitView> {
        let today = self.clock.today();
        let changed = self.repo.add_check_in(id, today)?;
        let view = HabitView::new(self.load(id)?, today);
        info!(
            "event=habit_check_in module=service status=ok habit_id={id} changed={changed} streak={}",
            view.streak
        );
        Ok(view)
    }

    /// Removes today's check-in when present.
    pub fn undo_check_in(&self, id: HabitId) -> HabitServiceResult<HabitView> {
        let today = self.clock.today();
        let changed = self.repo.remove_check_in(id, today)?;
        let view = HabitView::new(self.load(id)?, today);
        info!(
            "event=habit_undo_check_in module=service status=ok habit_id={id} changed={changed} streak={}",
            view.streak
        );
        Ok(view)
    }

    /// Summarizes all habits against today's date.
    pub fn statistics(&self) -> HabitServiceResult<HabitStatistics> {
        let habits = self.repo.list_habits()?;
        Ok(HabitStatistics::compute(&habits, self.clock.today()))
    }

    fn load(&self, id: HabitId) -> HabitServiceResult<Habit> {
        self.repo
            .get_habit(id)?
            .ok_or(HabitServiceError::HabitNotFound(id))
    }

    fn view(&self, habit: Habit) -> HabitView {
        HabitView::new(habit, self.clock.today())
    }
}
