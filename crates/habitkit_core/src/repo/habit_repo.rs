//! Habit repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed CRUD over habit records and their check-in sets.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Habit::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - A check-in mutation touches exactly one `(habit, date)` row and runs in
//!   its own transaction, so readers never observe a half-applied change.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::check_in::{format_check_in_date, parse_check_in_date, CheckInSet};
use crate::model::habit::{Habit, HabitId, HabitValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

const HABIT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    color,
    created_at,
    updated_at
FROM habits";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for habit persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] HabitValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("habit not found: {0}")]
    NotFound(HabitId),
    #[error("invalid persisted habit data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for habits and their check-in ledgers.
pub trait HabitRepository {
    /// Persists a new habit together with any check-ins it already carries.
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId>;
    /// Replaces habit metadata and `updated_at`. Check-ins are left untouched.
    fn update_habit(&self, habit: &Habit) -> RepoResult<()>;
    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>>;
    /// Lists every habit ordered by `created_at ASC, uuid ASC`.
    fn list_habits(&self) -> RepoResult<Vec<Habit>>;
    /// Deletes a habit and its whole check-in set.
    fn delete_habit(&self, id: HabitId) -> RepoResult<()>;
    /// Records a check-in. Returns `false` when the date was already present.
    fn add_check_in(&self, id: HabitId, date: NaiveDate) -> RepoResult<bool>;
    /// Removes a check-in. Returns `false` when the date was absent.
    fn remove_check_in(&self, id: HabitId, date: NaiveDate) -> RepoResult<bool>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Rejects connections that skipped `open_db` bootstrap.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId> {
        habit.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO habits (
                uuid,
                name,
                description,
                color,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                habit.id.to_string(),
                habit.name.as_str(),
                habit.description.as_str(),
                habit.color.as_str(),
                habit.created_at,
                habit.updated_at,
            ],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO check_ins (habit_uuid, check_in_date) VALUES (?1, ?2);",
            )?;
            for date in habit.check_ins.iter_ascending() {
                insert.execute(params![habit.id.to_string(), format_check_in_date(date)])?;
            }
        }
        tx.commit()?;

        Ok(habit.id)
    }

    fn update_habit(&self, habit: &Habit) -> RepoResult<()> {
        habit.validate()?;

        let changed = self.conn.execute(
            "UPDATE habits
             SET
                name = ?1,
                description = ?2,
                color = ?3,
                updated_at = ?4
             WHERE uuid = ?5;",
            params![
                habit.name.as_str(),
                habit.description.as_str(),
                habit.color.as_str(),
                habit.updated_at,
                habit.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(habit.id));
        }

        Ok(())
    }

    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        let tx = self.conn.unchecked_transaction()?;
        let habit = tx
            .query_row(
                &format!("{HABIT_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_habit_row(row)),
            )
            .optional()?
            .transpose()?;

        let Some(mut habit) = habit else {
            return Ok(None);
        };

        {
            let mut stmt = tx.prepare(
                "SELECT check_in_date
                 FROM check_ins
                 WHERE habit_uuid = ?1;",
            )?;
            let mut rows = stmt.query([id.to_string()])?;
            while let Some(row) = rows.next()? {
                let text: String = row.get("check_in_date")?;
                habit.check_ins.add(parse_date_column(&text)?);
            }
        }
        tx.commit()?;

        habit.validate()?;
        Ok(Some(habit))
    }

    fn list_habits(&self) -> RepoResult<Vec<Habit>> {
        let tx = self.conn.unchecked_transaction()?;

        let mut check_ins: HashMap<HabitId, CheckInSet> = HashMap::new();
        {
            let mut stmt = tx.prepare("SELECT habit_uuid, check_in_date FROM check_ins;")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let id = parse_uuid_column(&row.get::<_, String>("habit_uuid")?)?;
                let date = parse_date_column(&row.get::<_, String>("check_in_date")?)?;
                check_ins.entry(id).or_default().add(date);
            }
        }

        let mut habits = Vec::new();
        {
            let mut stmt =
                tx.prepare(&format!("{HABIT_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"))?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let mut habit = parse_habit_row(row)?;
                habit.check_ins = check_ins.remove(&habit.id).unwrap_or_default();
                habit.validate()?;
                habits.push(habit);
            }
        }
        tx.commit()?;

        Ok(habits)
    }

    fn delete_habit(&self, id: HabitId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn add_check_in(&self, id: HabitId, date: NaiveDate) -> RepoResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        ensure_habit_exists(&tx, id)?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO check_ins (habit_uuid, check_in_date) VALUES (?1, ?2);",
            params![id.to_string(), format_check_in_date(date)],
        )?;
        tx.commit()?;

        Ok(inserted > 0)
    }

    fn remove_check_in(&self, id: HabitId, date: NaiveDate) -> RepoResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        ensure_habit_exists(&tx, id)?;
        let removed = tx.execute(
            "DELETE FROM check_ins WHERE habit_uuid = ?1 AND check_in_date = ?2;",
            params![id.to_string(), format_check_in_date(date)],
        )?;
        tx.commit()?;

        Ok(removed > 0)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if version != latest_version() {
        return Err(RepoError::InvalidData(format!(
            "schema version {version} does not match expected {}; open the database with open_db",
            latest_version()
        )));
    }

    let foreign_keys: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if foreign_keys != 1 {
        return Err(RepoError::InvalidData(
            "foreign_keys must be enabled for check-in cascade".to_string(),
        ));
    }

    Ok(())
}

fn ensure_habit_exists(conn: &Connection, id: HabitId) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM habits WHERE uuid = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(RepoError::NotFound(id));
    }
    Ok(())
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let id = parse_uuid_column(&row.get::<_, String>("uuid")?)?;

    Ok(Habit {
        id,
        name: row.get("name")?,
        description: row.get("description")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        check_ins: CheckInSet::new(),
    })
}

fn parse_uuid_column(text: &str) -> RepoResult<HabitId> {
    Uuid::parse_str(text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in habit row")))
}

fn parse_date_column(text: &str) -> RepoResult<NaiveDate> {
    parse_check_in_date(text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{text}` in check_ins.check_in_date"
        ))
    })
}
