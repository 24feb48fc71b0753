//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record and its owned check-in set.
//! - Define validated create/update inputs for habit metadata.
//!
//! # Invariants
//! - `id` is stable and never reused for another habit.
//! - `name` is stored trimmed and is never blank.
//! - Metadata updates never touch `id`, `created_at` or `check_ins`.

use crate::model::check_in::CheckInSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier for a habit.
pub type HabitId = Uuid;

pub const DEFAULT_HABIT_COLOR: &str = "indigo";
pub const MAX_NAME_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;
pub const MAX_COLOR_CHARS: usize = 32;

/// Validation failures for habit metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HabitValidationError {
    #[error("habit name cannot be blank")]
    EmptyName,
    #[error("habit name exceeds {max} characters")]
    NameTooLong { max: usize },
    #[error("habit description exceeds {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("habit color cannot be blank")]
    EmptyColor,
    #[error("habit color exceeds {max} characters")]
    ColorTooLong { max: usize },
}

/// Canonical habit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    /// Empty when the user gave no description.
    pub description: String,
    /// Free-form display color (named color or hex code).
    pub color: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds of the last metadata change.
    pub updated_at: i64,
    pub check_ins: CheckInSet,
}

impl Habit {
    /// Creates a habit with a generated ID, default metadata and no check-ins.
    pub fn new(name: impl Into<String>, created_at: i64) -> Self {
        Self::with_id(Uuid::new_v4(), name, created_at)
    }

    /// Creates a habit with a caller-provided ID.
    ///
    /// Used by import paths where identity already exists.
    pub fn with_id(id: HabitId, name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            name: name.into().trim().to_string(),
            description: String::new(),
            color: DEFAULT_HABIT_COLOR.to_string(),
            created_at,
            updated_at: created_at,
            check_ins: CheckInSet::new(),
        }
    }

    /// Builds a fresh habit from creation input.
    pub fn from_new(input: NewHabit, created_at: i64) -> Self {
        let mut habit = Self::new(input.name, created_at);
        if let Some(description) = input.description {
            habit.description = description.trim().to_string();
        }
        if let Some(color) = input.color {
            habit.color = color.trim().to_string();
        }
        habit
    }

    /// Checks metadata invariants.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        validate_name(&self.name)?;
        validate_description(&self.description)?;
        validate_color(&self.color)
    }

    /// Applies every present field of `update` and stamps `updated_at`.
    ///
    /// The caller validates the result; this does not.
    pub fn apply_update(&mut self, update: &HabitUpdate, updated_at: i64) {
        self.updated_at = updated_at;
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &update.description {
            self.description = description.trim().to_string();
        }
        if let Some(color) = &update.color {
            self.color = color.trim().to_string();
        }
    }
}

/// Input for creating one habit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewHabit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial metadata update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HabitUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl HabitUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.color.is_none()
    }
}

fn validate_name(name: &str) -> Result<(), HabitValidationError> {
    if name.trim().is_empty() {
        return Err(HabitValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(HabitValidationError::NameTooLong {
            max: MAX_NAME_CHARS,
        });
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), HabitValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(HabitValidationError::DescriptionTooLong {
            max: MAX_DESCRIPTION_CHARS,
        });
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), HabitValidationError> {
    if color.trim().is_empty() {
        return Err(HabitValidationError::EmptyColor);
    }
    if color.chars().count() > MAX_COLOR_CHARS {
        return Err(HabitValidationError::ColorTooLong {
            max: MAX_COLOR_CHARS,
        });
    }
    Ok(())
}
