//! Habit, category and daily-state type definitions.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::habits::frequency::Frequency;

/// Label shared by habits and communities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A habit owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Display name
    pub name: String,
    /// Weekly schedule
    pub frequency: Frequency,
    /// Optional category
    pub category_id: Option<i64>,
    /// Day the habit was created
    pub created_on: NaiveDate,
}

impl Habit {
    /// Whether the habit is scheduled on `date`.
    pub fn is_due(&self, date: NaiveDate) -> bool {
        self.frequency.is_due(date)
    }
}

/// Fields for creating or updating a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub frequency: Frequency,
    pub category_id: Option<i64>,
    pub created_on: NaiveDate,
}

impl NewHabit {
    /// New habit created today, without category.
    pub fn new(name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            name: name.into(),
            frequency,
            category_id: None,
            created_on: Utc::now().date_naive(),
        }
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn created_on(mut self, date: NaiveDate) -> Self {
        self.created_on = date;
        self
    }
}

/// Completion state of a habit on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitState {
    /// Not done (also the state of a day with no row)
    #[default]
    Pending,
    /// Done
    Completed,
}

impl HabitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitState::Pending => "pending",
            HabitState::Completed => "completed",
        }
    }

    /// Parse a stored state. The legacy Spanish labels are accepted.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" | "pendiente" => Some(HabitState::Pending),
            "completed" | "completado" => Some(HabitState::Completed),
            _ => None,
        }
    }

    /// The opposite state.
    pub fn toggled(self) -> Self {
        match self {
            HabitState::Pending => HabitState::Completed,
            HabitState::Completed => HabitState::Pending,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, HabitState::Completed)
    }
}

/// Stored state for one (user, habit, date) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub user_id: i64,
    pub habit_id: i64,
    pub date: NaiveDate,
    pub state: HabitState,
}

/// Completion summary for a habit over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompletionStats {
    /// Days with a stored row
    pub tracked: u32,
    pub completed: u32,
    pub pending: u32,
    /// Completed share of tracked days, 0 when nothing is tracked
    pub completion_percent: f64,
}

impl CompletionStats {
    pub fn from_records(records: &[StateRecord]) -> Self {
        let tracked = records.len() as u32;
        let completed = records.iter().filter(|r| r.state.is_completed()).count() as u32;
        let completion_percent = if tracked == 0 {
            0.0
        } else {
            (completed as f64 / tracked as f64 * 10_000.0).round() / 100.0
        };

        Self {
            tracked,
            completed,
            pending: tracked - completed,
            completion_percent,
        }
    }
}

/// One line of a user's daily agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaEntry {
    pub habit: Habit,
    pub state: HabitState,
    pub streak: u32,
}
