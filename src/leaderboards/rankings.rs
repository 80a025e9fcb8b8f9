//! General points ranking.
//!
//! A user's points are the sum of the achievements they have unlocked. The
//! ranking lists every user, including those with no points, ordered by
//! points descending with ties broken by user id ascending. Positions are
//! 1-based row numbers, so tied users still get distinct positions.

use serde::{Deserialize, Serialize};

use crate::storage::{AchievementStore, DatabaseError};

/// Point total for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPoints {
    pub user_id: i64,
    pub username: String,
    pub points: i64,
}

/// Ranking row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position
    pub position: u32,
    pub user_id: i64,
    pub username: String,
    pub points: i64,
}

/// A user's place in the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankPosition {
    pub position: u32,
    pub points: i64,
    pub total_users: u32,
}

/// Ranking service.
pub struct RankingService<'a, S: AchievementStore> {
    store: &'a S,
}

impl<'a, S: AchievementStore> RankingService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Sum of the user's unlocked achievement points, 0 if none.
    pub fn total_points(&self, user_id: i64) -> Result<i64, DatabaseError> {
        Ok(self
            .store
            .achievements_for_user(user_id)?
            .iter()
            .map(|achievement| achievement.points)
            .sum())
    }

    /// Every user ranked by points.
    pub fn general_ranking(&self) -> Result<Vec<RankingEntry>, DatabaseError> {
        let mut totals = self.store.user_point_totals()?;
        totals.sort_by(|a, b| b.points.cmp(&a.points).then(a.user_id.cmp(&b.user_id)));

        Ok(totals
            .into_iter()
            .enumerate()
            .map(|(index, total)| RankingEntry {
                position: index as u32 + 1,
                user_id: total.user_id,
                username: total.username,
                points: total.points,
            })
            .collect())
    }

    /// The user's position. A user missing from the ranking is placed after
    /// everyone else with 0 points.
    pub fn position_of(&self, user_id: i64) -> Result<RankPosition, DatabaseError> {
        let ranking = self.general_ranking()?;
        let total_users = ranking.len() as u32;

        let position = match ranking.iter().find(|entry| entry.user_id == user_id) {
            Some(entry) => RankPosition {
                position: entry.position,
                points: entry.points,
                total_users,
            },
            None => RankPosition {
                position: total_users + 1,
                points: 0,
                total_users,
            },
        };

        Ok(position)
    }

    /// The first `limit` rows of the ranking.
    pub fn top(&self, limit: usize) -> Result<Vec<RankingEntry>, DatabaseError> {
        let mut ranking = self.general_ranking()?;
        ranking.truncate(limit);
        Ok(ranking)
    }
}
