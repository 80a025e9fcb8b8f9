//! Habits module.
//!
//! Covers everything tied to a single habit:
//! - Weekly schedules and due-date matching
//! - Daily completion state (absent means pending)
//! - Consecutive-day streaks
//! - Habit and category CRUD with a per-day agenda

pub mod frequency;
pub mod manager;
pub mod streaks;
pub mod tracking;
pub mod types;

pub use frequency::{is_due, Frequency, FrequencyError, WeekdaySet, WEEKDAY_NAMES};
pub use manager::{HabitError, HabitManager};
pub use streaks::current_streak;
pub use tracking::DailyStateTracker;
pub use types::{AgendaEntry, Category, CompletionStats, Habit, HabitState, NewHabit, StateRecord};
