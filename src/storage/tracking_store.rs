//! SQLite storage for daily habit state.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

use super::database::{format_date, parse_date, Database, DatabaseError};
use super::traits::DailyStateStore;
use crate::habits::{HabitState, StateRecord};

fn parse_state(value: &str) -> Result<HabitState, DatabaseError> {
    HabitState::from_str(value).ok_or_else(|| {
        DatabaseError::DeserializationError(format!("Unknown habit state '{}'", value))
    })
}

impl DailyStateStore for Database {
    fn get_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<Option<HabitState>, DatabaseError> {
        let state: Option<String> = self
            .connection()
            .query_row(
                "SELECT state FROM daily_states
                 WHERE user_id = ?1 AND habit_id = ?2 AND date = ?3",
                params![user_id, habit_id, format_date(date)],
                |row| row.get(0),
            )
            .optional()?;

        state.as_deref().map(parse_state).transpose()
    }

    fn put_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
        state: HabitState,
    ) -> Result<(), DatabaseError> {
        self.execute(
            "INSERT INTO daily_states (user_id, habit_id, date, state, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id, habit_id, date) DO UPDATE SET
                state = excluded.state,
                updated_at = excluded.updated_at",
            params![
                user_id,
                habit_id,
                format_date(date),
                state.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn delete_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        let deleted = self.execute(
            "DELETE FROM daily_states WHERE user_id = ?1 AND habit_id = ?2 AND date = ?3",
            params![user_id, habit_id, format_date(date)],
        )?;
        Ok(deleted > 0)
    }

    fn states_between(
        &self,
        user_id: i64,
        habit_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<StateRecord>, DatabaseError> {
        let mut stmt = self.connection().prepare(
            "SELECT date, state FROM daily_states
             WHERE user_id = ?1 AND habit_id = ?2 AND date >= ?3 AND date <= ?4
             ORDER BY date DESC",
        )?;

        let rows = stmt.query_map(
            params![user_id, habit_id, format_date(from), format_date(to)],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut records = Vec::new();
        for row in rows {
            let (date, state) = row?;
            records.push(StateRecord {
                user_id,
                habit_id,
                date: parse_date(&date)?,
                state: parse_state(&state)?,
            });
        }

        Ok(records)
    }
}
