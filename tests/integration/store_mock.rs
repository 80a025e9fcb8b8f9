//! Integration tests with mock stores.
//!
//! Scripted stores stand in for SQLite so the components can be checked for
//! how many lookups they issue and how they surface storage failures.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use habitrack::communities::{Membership, MembershipError, MembershipRules, MembershipStatus};
use habitrack::habits::{DailyStateTracker, HabitState, StateRecord};
use habitrack::storage::{DailyStateStore, DatabaseError, MembershipStore};
use habitrack::current_streak;

/// Daily state store backed by a map that counts point lookups.
#[derive(Default)]
pub struct CountingStateStore {
    rows: HashMap<NaiveDate, HabitState>,
    lookups: Cell<usize>,
    /// Fail every lookup when set
    pub offline: bool,
}

impl CountingStateStore {
    pub fn with_completed_run(end: NaiveDate, days: i64) -> Self {
        let mut store = Self::default();
        for back in 0..days {
            store
                .rows
                .insert(end - Duration::days(back), HabitState::Completed);
        }
        store
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl DailyStateStore for CountingStateStore {
    fn get_state(
        &self,
        _user_id: i64,
        _habit_id: i64,
        date: NaiveDate,
    ) -> Result<Option<HabitState>, DatabaseError> {
        self.lookups.set(self.lookups.get() + 1);
        if self.offline {
            return Err(DatabaseError::QueryFailed("store offline".to_string()));
        }
        Ok(self.rows.get(&date).copied())
    }

    fn put_state(
        &self,
        _user_id: i64,
        _habit_id: i64,
        _date: NaiveDate,
        _state: HabitState,
    ) -> Result<(), DatabaseError> {
        Err(DatabaseError::QueryFailed("read only".to_string()))
    }

    fn delete_state(
        &self,
        _user_id: i64,
        _habit_id: i64,
        _date: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        Ok(false)
    }

    fn states_between(
        &self,
        user_id: i64,
        habit_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<StateRecord>, DatabaseError> {
        let mut records: Vec<StateRecord> = self
            .rows
            .iter()
            .filter(|(date, _)| **date >= from && **date <= to)
            .map(|(date, state)| StateRecord {
                user_id,
                habit_id,
                date: *date,
                state: *state,
            })
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }
}

/// Membership store holding one community whose writes always fail.
pub struct BrokenMembershipStore {
    pub creator_id: i64,
}

impl MembershipStore for BrokenMembershipStore {
    fn community_creator(&self, community_id: i64) -> Result<Option<i64>, DatabaseError> {
        Ok((community_id == 1).then_some(self.creator_id))
    }

    fn get_membership(
        &self,
        _user_id: i64,
        _community_id: i64,
    ) -> Result<Option<Membership>, DatabaseError> {
        Ok(None)
    }

    fn insert_membership(&self, _membership: &Membership) -> Result<(), DatabaseError> {
        Err(DatabaseError::ConstraintViolation("disk full".to_string()))
    }

    fn update_membership_status(
        &self,
        _user_id: i64,
        _community_id: i64,
        _status: MembershipStatus,
    ) -> Result<bool, DatabaseError> {
        Ok(false)
    }

    fn delete_membership(&self, _user_id: i64, _community_id: i64) -> Result<bool, DatabaseError> {
        Ok(false)
    }

    fn count_memberships(
        &self,
        _community_id: i64,
        _status: Option<MembershipStatus>,
    ) -> Result<u32, DatabaseError> {
        Ok(0)
    }

    fn memberships_for_community(
        &self,
        _community_id: i64,
        _status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DatabaseError> {
        Ok(Vec::new())
    }

    fn memberships_for_user(
        &self,
        _user_id: i64,
        _status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DatabaseError> {
        Ok(Vec::new())
    }
}

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

#[test]
fn test_streak_lookups_are_bounded_by_run_length() {
    let store = CountingStateStore::with_completed_run(reference(), 5);

    assert_eq!(current_streak(&store, 1, 1, reference()).unwrap(), 5);
    // Five hits plus the miss that ends the run
    assert_eq!(store.lookups(), 6);
}

#[test]
fn test_streak_crosses_leap_day() {
    // 2024-03-01 back through 2024-02-29 and 2024-02-28
    let store = CountingStateStore::with_completed_run(reference(), 3);
    assert_eq!(current_streak(&store, 1, 1, reference()).unwrap(), 3);
}

#[test]
fn test_streak_propagates_store_failure() {
    let store = CountingStateStore {
        offline: true,
        ..Default::default()
    };

    let result = current_streak(&store, 1, 1, reference());
    assert!(matches!(result, Err(DatabaseError::QueryFailed(_))));
    assert_eq!(store.lookups(), 1);
}

#[test]
fn test_tracker_reports_write_failure() {
    let store = CountingStateStore::default();
    let tracker = DailyStateTracker::new(&store);

    assert!(tracker
        .upsert_state(1, 1, reference(), HabitState::Completed)
        .is_err());
}

#[test]
fn test_join_surfaces_store_error() {
    let store = BrokenMembershipStore { creator_id: 9 };
    let rules = MembershipRules::new(&store);

    assert!(matches!(
        rules.join(2, 1),
        Err(MembershipError::Database(DatabaseError::ConstraintViolation(_)))
    ));
    assert!(matches!(
        rules.join(2, 5),
        Err(MembershipError::CommunityNotFound(5))
    ));
}
