//! Habit and category management.
//!
//! CRUD over the `habits` and `categories` tables plus the per-day views
//! (`due_habits`, `agenda`) that combine schedules with tracked state.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::frequency::{Frequency, FrequencyError};
use super::streaks::current_streak;
use super::tracking::DailyStateTracker;
use super::types::{AgendaEntry, Category, Habit, NewHabit};
use crate::storage::{format_date, parse_date, Database, DatabaseError};

const HABIT_COLUMNS: &str = "id, user_id, name, frequency, category_id, created_on";

/// Manager for habits and categories.
pub struct HabitManager<'a> {
    db: &'a Database,
}

impl<'a> HabitManager<'a> {
    /// Create a new habit manager over an open database.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    // ---- Categories ----

    /// Create a category. Names are unique.
    pub fn create_category(&self, name: &str) -> Result<Category, HabitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HabitError::ValidationError(
                "Category name cannot be empty".to_string(),
            ));
        }
        if self.get_category_by_name(name)?.is_some() {
            return Err(HabitError::CategoryExists(name.to_string()));
        }

        self.db.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;

        let category = Category {
            id: self.db.last_insert_id(),
            name: name.to_string(),
        };
        tracing::info!("Created category {} ({})", category.name, category.id);
        Ok(category)
    }

    pub fn get_category(&self, id: i64) -> Result<Option<Category>, HabitError> {
        self.db
            .connection()
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(HabitError::from)
    }

    pub fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, HabitError> {
        self.db
            .connection()
            .query_row(
                "SELECT id, name FROM categories WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(HabitError::from)
    }

    /// All categories ordered by name.
    pub fn list_categories(&self) -> Result<Vec<Category>, HabitError> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT id, name FROM categories ORDER BY name ASC")?;

        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(HabitError::from)
    }

    /// Delete a category. Habits that used it lose their category.
    pub fn delete_category(&self, id: i64) -> Result<bool, HabitError> {
        let deleted = self
            .db
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ---- Habits ----

    /// Create a habit for a user.
    pub fn create_habit(&self, user_id: i64, habit: &NewHabit) -> Result<Habit, HabitError> {
        validate_name(&habit.name)?;

        self.db.execute(
            "INSERT INTO habits (user_id, name, frequency, category_id, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                habit.name,
                habit.frequency.descriptor(),
                habit.category_id,
                format_date(habit.created_on),
            ],
        )?;

        let created = Habit {
            id: self.db.last_insert_id(),
            user_id,
            name: habit.name.clone(),
            frequency: habit.frequency,
            category_id: habit.category_id,
            created_on: habit.created_on,
        };

        tracing::info!(
            "Created habit '{}' ({}) for user {} [{}]",
            created.name,
            created.id,
            user_id,
            created.frequency
        );
        Ok(created)
    }

    /// Create a habit from a raw stored-form descriptor.
    pub fn create_habit_from_descriptor(
        &self,
        user_id: i64,
        name: &str,
        descriptor: &str,
        category_id: Option<i64>,
    ) -> Result<Habit, HabitError> {
        let mut habit = NewHabit::new(name, Frequency::parse(descriptor)?);
        habit.category_id = category_id;
        self.create_habit(user_id, &habit)
    }

    pub fn get_habit(&self, id: i64) -> Result<Option<Habit>, HabitError> {
        let row = self
            .db
            .connection()
            .query_row(
                &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
                params![id],
                HabitRow::from_row,
            )
            .optional()?;

        row.map(HabitRow::into_habit).transpose()
    }

    /// A user's habits in creation order.
    pub fn habits_for_user(&self, user_id: i64) -> Result<Vec<Habit>, HabitError> {
        let mut stmt = self.db.connection().prepare(&format!(
            "SELECT {} FROM habits WHERE user_id = ?1 ORDER BY id ASC",
            HABIT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![user_id], HabitRow::from_row)?;

        rows.collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(HabitRow::into_habit)
            .collect()
    }

    /// Replace name, frequency and category of a habit.
    pub fn update_habit(&self, id: i64, habit: &NewHabit) -> Result<Habit, HabitError> {
        validate_name(&habit.name)?;

        let updated = self.db.execute(
            "UPDATE habits SET name = ?1, frequency = ?2, category_id = ?3 WHERE id = ?4",
            params![habit.name, habit.frequency.descriptor(), habit.category_id, id],
        )?;

        if updated == 0 {
            return Err(HabitError::NotFound(id));
        }

        self.get_habit(id)?.ok_or(HabitError::NotFound(id))
    }

    /// Delete a habit and its tracked states.
    pub fn delete_habit(&self, id: i64) -> Result<bool, HabitError> {
        let deleted = self.db.execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        if deleted > 0 {
            tracing::info!("Deleted habit {}", id);
        }
        Ok(deleted > 0)
    }

    /// The user's habits scheduled on `date`.
    pub fn due_habits(&self, user_id: i64, date: NaiveDate) -> Result<Vec<Habit>, HabitError> {
        Ok(self
            .habits_for_user(user_id)?
            .into_iter()
            .filter(|habit| habit.is_due(date))
            .collect())
    }

    /// Due habits with their state and current streak on `date`.
    pub fn agenda(&self, user_id: i64, date: NaiveDate) -> Result<Vec<AgendaEntry>, HabitError> {
        let tracker = DailyStateTracker::new(self.db);

        self.due_habits(user_id, date)?
            .into_iter()
            .map(|habit| {
                let state = tracker.get_state(user_id, habit.id, date)?;
                let streak = current_streak(self.db, user_id, habit.id, date)?;
                Ok(AgendaEntry {
                    habit,
                    state,
                    streak,
                })
            })
            .collect()
    }
}

fn validate_name(name: &str) -> Result<(), HabitError> {
    if name.trim().is_empty() {
        return Err(HabitError::ValidationError(
            "Habit name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Raw `habits` row before descriptor and date parsing.
struct HabitRow {
    id: i64,
    user_id: i64,
    name: String,
    frequency: String,
    category_id: Option<i64>,
    created_on: String,
}

impl HabitRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            frequency: row.get(3)?,
            category_id: row.get(4)?,
            created_on: row.get(5)?,
        })
    }

    fn into_habit(self) -> Result<Habit, HabitError> {
        Ok(Habit {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            frequency: Frequency::parse(&self.frequency)?,
            category_id: self.category_id,
            created_on: parse_date(&self.created_on)?,
        })
    }
}

/// Habit management errors.
#[derive(Debug, thiserror::Error)]
pub enum HabitError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Frequency(#[from] FrequencyError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Category already exists: {0}")]
    CategoryExists(String),

    #[error("Habit not found: {0}")]
    NotFound(i64),
}

impl From<rusqlite::Error> for HabitError {
    fn from(error: rusqlite::Error) -> Self {
        HabitError::Database(error.into())
    }
}
