//! Integration tests for habit tracking.
//!
//! Runs the full flow against a file-backed database: create a user and
//! habits, mark days, reopen the database and read the agenda back.

use chrono::{Duration, NaiveDate};
use habitrack::habits::{
    DailyStateTracker, Frequency, HabitError, HabitManager, HabitState, NewHabit,
};
use habitrack::users::{NewUser, UserManager};
use habitrack::{current_streak, Database};
use tempfile::tempdir;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
}

#[test]
fn test_tracking_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("habitrack.db");

    let (user_id, habit_id) = {
        let db = Database::open(&path).unwrap();
        let user = UserManager::new(&db)
            .create_user(&NewUser::new("marta", "Marta", "Díaz"))
            .unwrap();
        let habit = HabitManager::new(&db)
            .create_habit(
                user.id,
                &NewHabit::new("Caminar", Frequency::Daily).created_on(monday()),
            )
            .unwrap();

        let tracker = DailyStateTracker::new(&db);
        for back in 0..3 {
            tracker
                .upsert_state(user.id, habit.id, monday() - Duration::days(back), HabitState::Completed)
                .unwrap();
        }
        (user.id, habit.id)
    };

    let db = Database::open(&path).unwrap();
    assert_eq!(current_streak(&db, user_id, habit_id, monday()).unwrap(), 3);

    let agenda = HabitManager::new(&db).agenda(user_id, monday()).unwrap();
    assert_eq!(agenda.len(), 1);
    assert_eq!(agenda[0].habit.name, "Caminar");
    assert_eq!(agenda[0].streak, 3);
}

#[test]
fn test_weekly_schedule_agenda() {
    let db = Database::open_in_memory().unwrap();
    let user = UserManager::new(&db)
        .create_user(&NewUser::new("leo", "Leo", "Mora"))
        .unwrap();
    let habits = HabitManager::new(&db);

    habits
        .create_habit_from_descriptor(user.id, "Pesas", "Lunes,Miércoles,Viernes", None)
        .unwrap();
    habits
        .create_habit_from_descriptor(user.id, "Descanso", "Domingo", None)
        .unwrap();
    habits
        .create_habit(user.id, &NewHabit::new("Agua", Frequency::Daily))
        .unwrap();

    let counts: Vec<usize> = (0..7)
        .map(|offset| {
            habits
                .due_habits(user.id, monday() + Duration::days(offset))
                .unwrap()
                .len()
        })
        .collect();
    assert_eq!(counts, vec![2, 1, 2, 1, 2, 1, 2]);
}

#[test]
fn test_streak_does_not_skip_unscheduled_days() {
    let db = Database::open_in_memory().unwrap();
    let user = UserManager::new(&db)
        .create_user(&NewUser::new("sol", "Sol", "Ortiz"))
        .unwrap();
    let habit = HabitManager::new(&db)
        .create_habit_from_descriptor(user.id, "Natación", "Lunes,Miércoles", None)
        .unwrap();
    let tracker = DailyStateTracker::new(&db);

    let wednesday = monday() + Duration::days(2);
    tracker
        .upsert_state(user.id, habit.id, monday(), HabitState::Completed)
        .unwrap();
    tracker
        .upsert_state(user.id, habit.id, wednesday, HabitState::Completed)
        .unwrap();

    // Tuesday has no row, so the streak stops there
    assert_eq!(current_streak(&db, user.id, habit.id, wednesday).unwrap(), 1);
}

#[test]
fn test_deleting_habit_removes_its_states() {
    let db = Database::open_in_memory().unwrap();
    let user = UserManager::new(&db)
        .create_user(&NewUser::new("ivan", "Iván", "Cruz"))
        .unwrap();
    let habits = HabitManager::new(&db);
    let habit = habits
        .create_habit(user.id, &NewHabit::new("Leer", Frequency::Daily))
        .unwrap();
    let tracker = DailyStateTracker::new(&db);
    tracker
        .upsert_state(user.id, habit.id, monday(), HabitState::Completed)
        .unwrap();

    habits.delete_habit(habit.id).unwrap();

    assert!(tracker
        .states_between(user.id, habit.id, monday(), monday())
        .unwrap()
        .is_empty());
}

#[test]
fn test_habit_for_unknown_user_is_rejected() {
    let db = Database::open_in_memory().unwrap();
    let result = HabitManager::new(&db).create_habit(404, &NewHabit::new("x", Frequency::Daily));
    assert!(matches!(result, Err(HabitError::Database(_))));
}
