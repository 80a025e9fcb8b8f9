//! Unit tests for streak calculation

use chrono::{Duration, NaiveDate};
use habitrack::habits::{current_streak, DailyStateTracker, HabitState};
use habitrack::MemoryStore;

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

#[test]
fn test_streak_crosses_month_and_leap_day() {
    let store = MemoryStore::new();
    let tracker = DailyStateTracker::new(&store);

    // 2024-02-27 .. 2024-03-01
    for back in 0..4 {
        tracker
            .upsert_state(1, 1, reference() - Duration::days(back), HabitState::Completed)
            .unwrap();
    }

    assert_eq!(current_streak(&store, 1, 1, reference()).unwrap(), 4);
}

#[test]
fn test_toggle_breaks_and_restores_streak() {
    let store = MemoryStore::new();
    let tracker = DailyStateTracker::new(&store);

    for back in 0..5 {
        tracker
            .upsert_state(1, 1, reference() - Duration::days(back), HabitState::Completed)
            .unwrap();
    }
    let middle = reference() - Duration::days(2);

    tracker.toggle(1, 1, middle).unwrap();
    assert_eq!(current_streak(&store, 1, 1, reference()).unwrap(), 2);

    tracker.toggle(1, 1, middle).unwrap();
    assert_eq!(current_streak(&store, 1, 1, reference()).unwrap(), 5);
}

#[test]
fn test_empty_history_has_no_streak() {
    let store = MemoryStore::new();
    assert_eq!(current_streak(&store, 1, 1, reference()).unwrap(), 0);
}

#[test]
fn test_future_reference_date_starts_from_that_day() {
    let store = MemoryStore::new();
    let tracker = DailyStateTracker::new(&store);
    tracker
        .upsert_state(1, 1, reference(), HabitState::Completed)
        .unwrap();

    let tomorrow = reference() + Duration::days(1);
    assert_eq!(current_streak(&store, 1, 1, tomorrow).unwrap(), 0);
}
