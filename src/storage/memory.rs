//! In-memory implementation of the persistence traits.
//!
//! Mirrors the SQLite behavior that callers can observe, including the
//! uniqueness and reference constraints, without touching disk. Used as a
//! test double for the tracking, progression, ranking and membership
//! components.

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::BTreeMap;

use super::database::DatabaseError;
use super::traits::{AchievementStore, DailyStateStore, LevelStore, MembershipStore};
use crate::achievements::{Achievement, NewAchievement};
use crate::communities::{Membership, MembershipStatus};
use crate::habits::{HabitState, StateRecord};
use crate::leaderboards::UserPoints;
use crate::progression::{Level, NewLevel};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    /// user id -> username
    users: BTreeMap<i64, String>,
    /// community id -> creator id
    communities: BTreeMap<i64, i64>,
    states: BTreeMap<(i64, i64, NaiveDate), HabitState>,
    achievements: BTreeMap<i64, Achievement>,
    /// (user, achievement) in unlock order
    unlocks: Vec<(i64, i64)>,
    levels: BTreeMap<i64, Level>,
    /// user id -> level id
    assignments: BTreeMap<i64, i64>,
    /// keyed by (community, user)
    memberships: BTreeMap<(i64, i64), Membership>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Persistence store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RefCell<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user named `user<id>` and return their id.
    pub fn add_user(&self) -> i64 {
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state.users.insert(id, format!("user{}", id));
        id
    }

    /// Register a user with the given username and return their id.
    pub fn add_named_user(&self, username: impl Into<String>) -> i64 {
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state.users.insert(id, username.into());
        id
    }

    /// Register a community created by `creator_id` and return its id.
    pub fn add_community(&self, creator_id: i64) -> i64 {
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state.communities.insert(id, creator_id);
        id
    }
}

fn constraint(message: impl Into<String>) -> DatabaseError {
    DatabaseError::ConstraintViolation(message.into())
}

impl DailyStateStore for MemoryStore {
    fn get_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<Option<HabitState>, DatabaseError> {
        Ok(self
            .state
            .borrow()
            .states
            .get(&(user_id, habit_id, date))
            .copied())
    }

    fn put_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
        state: HabitState,
    ) -> Result<(), DatabaseError> {
        self.state
            .borrow_mut()
            .states
            .insert((user_id, habit_id, date), state);
        Ok(())
    }

    fn delete_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        Ok(self
            .state
            .borrow_mut()
            .states
            .remove(&(user_id, habit_id, date))
            .is_some())
    }

    fn states_between(
        &self,
        user_id: i64,
        habit_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<StateRecord>, DatabaseError> {
        if from > to {
            return Ok(Vec::new());
        }

        Ok(self
            .state
            .borrow()
            .states
            .range((user_id, habit_id, from)..=(user_id, habit_id, to))
            .rev()
            .map(|(&(user_id, habit_id, date), &state)| StateRecord {
                user_id,
                habit_id,
                date,
                state,
            })
            .collect())
    }
}

impl AchievementStore for MemoryStore {
    fn insert_achievement(&self, achievement: &NewAchievement) -> Result<Achievement, DatabaseError> {
        let mut state = self.state.borrow_mut();
        let created = Achievement {
            id: state.allocate_id(),
            name: achievement.name.clone(),
            points: achievement.points,
            description: achievement.description.clone(),
        };
        state.achievements.insert(created.id, created.clone());
        Ok(created)
    }

    fn get_achievement(&self, achievement_id: i64) -> Result<Option<Achievement>, DatabaseError> {
        Ok(self.state.borrow().achievements.get(&achievement_id).cloned())
    }

    fn list_achievements(&self) -> Result<Vec<Achievement>, DatabaseError> {
        Ok(self.state.borrow().achievements.values().cloned().collect())
    }

    fn unlock_achievement(&self, user_id: i64, achievement_id: i64) -> Result<bool, DatabaseError> {
        let mut state = self.state.borrow_mut();
        if !state.users.contains_key(&user_id) || !state.achievements.contains_key(&achievement_id) {
            return Err(constraint("FOREIGN KEY constraint failed"));
        }
        if state.unlocks.contains(&(user_id, achievement_id)) {
            return Ok(false);
        }
        state.unlocks.push((user_id, achievement_id));
        Ok(true)
    }

    fn achievements_for_user(&self, user_id: i64) -> Result<Vec<Achievement>, DatabaseError> {
        let state = self.state.borrow();
        Ok(state
            .unlocks
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, achievement)| state.achievements.get(achievement).cloned())
            .collect())
    }

    fn user_point_totals(&self) -> Result<Vec<UserPoints>, DatabaseError> {
        let state = self.state.borrow();
        Ok(state
            .users
            .iter()
            .map(|(&user_id, username)| UserPoints {
                user_id,
                username: username.clone(),
                points: state
                    .unlocks
                    .iter()
                    .filter(|(user, _)| *user == user_id)
                    .filter_map(|(_, achievement)| state.achievements.get(achievement))
                    .map(|achievement| achievement.points)
                    .sum(),
            })
            .collect())
    }
}

impl LevelStore for MemoryStore {
    fn insert_level(&self, level: &NewLevel) -> Result<Level, DatabaseError> {
        let mut state = self.state.borrow_mut();
        if state
            .levels
            .values()
            .any(|existing| existing.points_required == level.points_required)
        {
            return Err(constraint("UNIQUE constraint failed: levels.points_required"));
        }

        let created = Level {
            id: state.allocate_id(),
            name: level.name.clone(),
            points_required: level.points_required,
            points_total: level.points_total,
        };
        state.levels.insert(created.id, created.clone());
        Ok(created)
    }

    fn all_levels(&self) -> Result<Vec<Level>, DatabaseError> {
        let mut levels: Vec<Level> = self.state.borrow().levels.values().cloned().collect();
        levels.sort_by_key(|level| level.points_required);
        Ok(levels)
    }

    fn level_assignment(&self, user_id: i64) -> Result<Option<i64>, DatabaseError> {
        Ok(self.state.borrow().assignments.get(&user_id).copied())
    }

    fn put_level_assignment(&self, user_id: i64, level_id: i64) -> Result<(), DatabaseError> {
        let mut state = self.state.borrow_mut();
        if !state.users.contains_key(&user_id) || !state.levels.contains_key(&level_id) {
            return Err(constraint("FOREIGN KEY constraint failed"));
        }
        state.assignments.insert(user_id, level_id);
        Ok(())
    }

    fn clear_level_assignment(&self, user_id: i64) -> Result<bool, DatabaseError> {
        Ok(self.state.borrow_mut().assignments.remove(&user_id).is_some())
    }

    fn users_at_level(&self, level_id: i64) -> Result<Vec<i64>, DatabaseError> {
        Ok(self
            .state
            .borrow()
            .assignments
            .iter()
            .filter(|(_, level)| **level == level_id)
            .map(|(user, _)| *user)
            .collect())
    }
}

impl MembershipStore for MemoryStore {
    fn community_creator(&self, community_id: i64) -> Result<Option<i64>, DatabaseError> {
        Ok(self.state.borrow().communities.get(&community_id).copied())
    }

    fn get_membership(
        &self,
        user_id: i64,
        community_id: i64,
    ) -> Result<Option<Membership>, DatabaseError> {
        Ok(self
            .state
            .borrow()
            .memberships
            .get(&(community_id, user_id))
            .cloned())
    }

    fn insert_membership(&self, membership: &Membership) -> Result<(), DatabaseError> {
        let mut state = self.state.borrow_mut();
        if !state.users.contains_key(&membership.user_id)
            || !state.communities.contains_key(&membership.community_id)
        {
            return Err(constraint("FOREIGN KEY constraint failed"));
        }

        let key = (membership.community_id, membership.user_id);
        if state.memberships.contains_key(&key) {
            return Err(constraint(
                "UNIQUE constraint failed: community_memberships.user_id, community_memberships.community_id",
            ));
        }
        state.memberships.insert(key, membership.clone());
        Ok(())
    }

    fn update_membership_status(
        &self,
        user_id: i64,
        community_id: i64,
        status: MembershipStatus,
    ) -> Result<bool, DatabaseError> {
        match self
            .state
            .borrow_mut()
            .memberships
            .get_mut(&(community_id, user_id))
        {
            Some(membership) => {
                membership.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_membership(&self, user_id: i64, community_id: i64) -> Result<bool, DatabaseError> {
        Ok(self
            .state
            .borrow_mut()
            .memberships
            .remove(&(community_id, user_id))
            .is_some())
    }

    fn count_memberships(
        &self,
        community_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<u32, DatabaseError> {
        Ok(self.memberships_for_community(community_id, status)?.len() as u32)
    }

    fn memberships_for_community(
        &self,
        community_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DatabaseError> {
        Ok(self
            .state
            .borrow()
            .memberships
            .values()
            .filter(|m| m.community_id == community_id)
            .filter(|m| status.map_or(true, |status| m.status == status))
            .cloned()
            .collect())
    }

    fn memberships_for_user(
        &self,
        user_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DatabaseError> {
        Ok(self
            .state
            .borrow()
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .filter(|m| status.map_or(true, |status| m.status == status))
            .cloned()
            .collect())
    }
}
