//! Cross-habit statistics projection.
//!
//! # Responsibility
//! - Summarize all habits for dashboard-style reporting.
//!
//! # Invariants
//! - Pure over `(habits, today)`; nothing here is persisted.
//! - Streak figures come from `streak::compute_streak` only.

use crate::model::habit::{Habit, HabitId};
use crate::streak::compute_streak;
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Maximum number of entries in `HabitStatistics::top_habits`.
pub const TOP_HABITS_LIMIT: usize = 5;
/// Number of days covered by `HabitStatistics::week_activity`.
pub const WEEK_ACTIVITY_DAYS: u64 = 7;

/// One habit ranked by current streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopHabit {
    pub id: HabitId,
    pub name: String,
    pub streak: u32,
    pub total_check_ins: usize,
}

/// Number of habits checked in on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub check_ins: usize,
}

/// Dashboard summary across all habits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitStatistics {
    pub today: NaiveDate,
    pub total_habits: usize,
    pub total_check_ins: usize,
    /// Highest current streak among all habits.
    pub best_current_streak: u32,
    /// Rounded percentage of habits checked in today.
    pub completion_rate_today: u32,
    /// Sorted by streak desc, then name, then id.
    pub top_habits: Vec<TopHabit>,
    /// The seven days before `today`, oldest first.
    pub week_activity: Vec<DayActivity>,
}

impl HabitStatistics {
    pub fn compute(habits: &[Habit], today: NaiveDate) -> Self {
        let mut ranked: Vec<TopHabit> = habits
            .iter()
            .map(|habit| TopHabit {
                id: habit.id,
                name: habit.name.clone(),
                streak: compute_streak(&habit.check_ins, today),
                total_check_ins: habit.check_ins.len(),
            })
            .collect();

        let best_current_streak = ranked.iter().map(|entry| entry.streak).max().unwrap_or(0);
        let total_check_ins: usize = ranked.iter().map(|entry| entry.total_check_ins).sum();

        ranked.sort_by(|a, b| {
            b.streak
                .cmp(&a.streak)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        ranked.truncate(TOP_HABITS_LIMIT);

        let checked_in_today = habits
            .iter()
            .filter(|habit| habit.check_ins.contains(today))
            .count();

        Self {
            today,
            total_habits: habits.len(),
            total_check_ins,
            best_current_streak,
            completion_rate_today: rounded_percent(checked_in_today, habits.len()),
            top_habits: ranked,
            week_activity: week_activity(habits, today),
        }
    }
}

/// `part / total` as a percentage, rounded half up. Zero when `total` is zero.
pub(crate) fn rounded_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let percent = (part * 100 + total / 2) / total;
    u32::try_from(percent).unwrap_or(u32::MAX)
}

fn week_activity(habits: &[Habit], today: NaiveDate) -> Vec<DayActivity> {
    (1..=WEEK_ACTIVITY_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| DayActivity {
            date,
            check_ins: habits
                .iter()
                .filter(|habit| habit.check_ins.contains(date))
                .count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{rounded_percent, HabitStatistics, TOP_HABITS_LIMIT};
    use crate::model::habit::Habit;
    use chrono::{Days, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid test date")
    }

    fn habit_with(name: &str, offsets: &[u64]) -> Habit {
        let mut habit = Habit::new(name, 0);
        for offset in offsets {
            habit.check_ins.add(today() - Days::new(*offset));
        }
        habit
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let stats = HabitStatistics::compute(&[], today());
        assert_eq!(stats.total_habits, 0);
        assert_eq!(stats.total_check_ins, 0);
        assert_eq!(stats.best_current_streak, 0);
        assert_eq!(stats.completion_rate_today, 0);
        assert!(stats.top_habits.is_empty());
        assert_eq!(stats.week_activity.len(), 7);
        assert!(stats.week_activity.iter().all(|day| day.check_ins == 0));
    }

    #[test]
    fn summary_counts_streaks_and_today_completion() {
        let habits = vec![
            habit_with("read", &[0, 1, 2]),
            habit_with("run", &[1, 2, 3, 4]),
            habit_with("stretch", &[0]),
        ];
        let stats = HabitStatistics::compute(&habits, today());

        assert_eq!(stats.total_habits, 3);
        assert_eq!(stats.total_check_ins, 8);
        assert_eq!(stats.best_current_streak, 3);
        assert_eq!(stats.completion_rate_today, 67);

        let names: Vec<&str> = stats.top_habits.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["read", "stretch", "run"]);
    }

    #[test]
    fn top_habits_are_capped() {
        let habits: Vec<Habit> = (0..8).map(|i| habit_with(&format!("h{i}"), &[0])).collect();
        let stats = HabitStatistics::compute(&habits, today());
        assert_eq!(stats.top_habits.len(), TOP_HABITS_LIMIT);
    }

    #[test]
    fn week_activity_covers_the_seven_days_before_today() {
        let habits = vec![habit_with("a", &[0, 1, 7, 8]), habit_with("b", &[1])];
        let stats = HabitStatistics::compute(&habits, today());

        let first = stats.week_activity.first().expect("seven entries");
        let last = stats.week_activity.last().expect("seven entries");
        assert_eq!(first.date, today() - Days::new(7));
        assert_eq!(first.check_ins, 1);
        assert_eq!(last.date, today() - Days::new(1));
        assert_eq!(last.check_ins, 2);
    }

    #[test]
    fn rounded_percent_rounds_half_up() {
        assert_eq!(rounded_percent(1, 2), 50);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 8), 13);
    }
}
