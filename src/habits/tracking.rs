//! Daily completion state with upsert semantics.
//!
//! A missing row means the habit is pending for that day. Every write goes
//! through a single upsert on the store, so repeated writes are idempotent
//! and the last one wins.

use chrono::NaiveDate;

use crate::habits::types::{CompletionStats, HabitState, StateRecord};
use crate::storage::{DailyStateStore, DatabaseError};

/// Reads and writes per-day habit state.
pub struct DailyStateTracker<'a, S: DailyStateStore> {
    store: &'a S,
}

impl<'a, S: DailyStateStore> DailyStateTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Overwrite the state for the key, inserting when no row exists.
    pub fn upsert_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
        state: HabitState,
    ) -> Result<StateRecord, DatabaseError> {
        self.store.put_state(user_id, habit_id, date, state)?;

        tracing::debug!(
            "Habit {} for user {} on {} set to {}",
            habit_id,
            user_id,
            date,
            state.as_str()
        );

        Ok(StateRecord {
            user_id,
            habit_id,
            date,
            state,
        })
    }

    /// Effective state for the key, pending when nothing is stored.
    pub fn get_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<HabitState, DatabaseError> {
        Ok(self
            .store
            .get_state(user_id, habit_id, date)?
            .unwrap_or_default())
    }

    /// Flip the effective state and store the result.
    pub fn toggle(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<StateRecord, DatabaseError> {
        let current = self.get_state(user_id, habit_id, date)?;
        self.upsert_state(user_id, habit_id, date, current.toggled())
    }

    /// Remove the stored row, returning the day to implicit pending.
    pub fn delete_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        self.store.delete_state(user_id, habit_id, date)
    }

    /// Stored rows within `from..=to`, newest first. Empty when `from > to`.
    pub fn states_between(
        &self,
        user_id: i64,
        habit_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<StateRecord>, DatabaseError> {
        if from > to {
            return Ok(Vec::new());
        }
        self.store.states_between(user_id, habit_id, from, to)
    }

    /// Completion summary over the stored rows within `from..=to`.
    pub fn completion_stats(
        &self,
        user_id: i64,
        habit_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<CompletionStats, DatabaseError> {
        let records = self.states_between(user_id, habit_id, from, to)?;
        Ok(CompletionStats::from_records(&records))
    }
}
