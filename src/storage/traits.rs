//! Persistence contracts consumed by the tracking, progression, ranking and
//! membership components.
//!
//! [`Database`](crate::storage::Database) implements every trait against
//! SQLite; [`MemoryStore`](crate::storage::MemoryStore) implements them in
//! memory. Each method is one logical statement: it either fully applies or
//! returns an error, and no method is retried.

use chrono::NaiveDate;

use crate::achievements::{Achievement, NewAchievement};
use crate::communities::{Membership, MembershipStatus};
use crate::habits::{HabitState, StateRecord};
use crate::leaderboards::UserPoints;
use crate::progression::{Level, NewLevel};
use crate::storage::DatabaseError;

/// Per-(user, habit, date) completion state.
pub trait DailyStateStore {
    /// Stored state for the key, `None` when no row exists.
    fn get_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<Option<HabitState>, DatabaseError>;

    /// Insert or overwrite the state for the key.
    fn put_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
        state: HabitState,
    ) -> Result<(), DatabaseError>;

    /// Remove the row for the key. Returns whether a row existed.
    fn delete_state(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<bool, DatabaseError>;

    /// Stored rows for a habit within `from..=to`, newest first.
    fn states_between(
        &self,
        user_id: i64,
        habit_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<StateRecord>, DatabaseError>;
}

/// Achievement catalog and per-user unlocks.
pub trait AchievementStore {
    fn insert_achievement(&self, achievement: &NewAchievement) -> Result<Achievement, DatabaseError>;

    fn get_achievement(&self, achievement_id: i64) -> Result<Option<Achievement>, DatabaseError>;

    fn list_achievements(&self) -> Result<Vec<Achievement>, DatabaseError>;

    /// Record an unlock. Returns `false` when the pair was already unlocked.
    fn unlock_achievement(&self, user_id: i64, achievement_id: i64) -> Result<bool, DatabaseError>;

    /// Achievements a user has unlocked.
    fn achievements_for_user(&self, user_id: i64) -> Result<Vec<Achievement>, DatabaseError>;

    /// Point totals for every known user, including users with no unlocks.
    /// No ordering is guaranteed.
    fn user_point_totals(&self) -> Result<Vec<UserPoints>, DatabaseError>;
}

/// Level table and the single current level per user.
pub trait LevelStore {
    fn insert_level(&self, level: &NewLevel) -> Result<Level, DatabaseError>;

    /// Every level ordered by `points_required` ascending.
    fn all_levels(&self) -> Result<Vec<Level>, DatabaseError>;

    /// Id of the level currently assigned to a user.
    fn level_assignment(&self, user_id: i64) -> Result<Option<i64>, DatabaseError>;

    /// Insert or overwrite the user's current level.
    fn put_level_assignment(&self, user_id: i64, level_id: i64) -> Result<(), DatabaseError>;

    /// Remove the user's assignment. Returns whether one existed.
    fn clear_level_assignment(&self, user_id: i64) -> Result<bool, DatabaseError>;

    /// Ids of users currently assigned to a level.
    fn users_at_level(&self, level_id: i64) -> Result<Vec<i64>, DatabaseError>;
}

/// Community membership rows.
pub trait MembershipStore {
    /// Creator of a community, `None` when the community does not exist.
    fn community_creator(&self, community_id: i64) -> Result<Option<i64>, DatabaseError>;

    fn get_membership(
        &self,
        user_id: i64,
        community_id: i64,
    ) -> Result<Option<Membership>, DatabaseError>;

    fn insert_membership(&self, membership: &Membership) -> Result<(), DatabaseError>;

    /// Overwrite the status of an existing row. Returns whether a row matched.
    fn update_membership_status(
        &self,
        user_id: i64,
        community_id: i64,
        status: MembershipStatus,
    ) -> Result<bool, DatabaseError>;

    /// Returns whether a row was removed.
    fn delete_membership(&self, user_id: i64, community_id: i64) -> Result<bool, DatabaseError>;

    fn count_memberships(
        &self,
        community_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<u32, DatabaseError>;

    fn memberships_for_community(
        &self,
        community_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DatabaseError>;

    fn memberships_for_user(
        &self,
        user_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DatabaseError>;
}
