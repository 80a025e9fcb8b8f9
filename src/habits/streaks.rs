//! Consecutive-day completion streaks.

use chrono::NaiveDate;

use crate::storage::{DailyStateStore, DatabaseError};

/// Count consecutive completed days ending at `reference_date`.
///
/// Walks backward one day at a time and stops at the first day that is not
/// completed, including days with no stored row. Days outside the habit's
/// schedule are not skipped.
pub fn current_streak<S: DailyStateStore>(
    store: &S,
    user_id: i64,
    habit_id: i64,
    reference_date: NaiveDate,
) -> Result<u32, DatabaseError> {
    let mut streak = 0;
    let mut day = reference_date;

    loop {
        match store.get_state(user_id, habit_id, day)? {
            Some(state) if state.is_completed() => streak += 1,
            _ => break,
        }

        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    Ok(streak)
}
