//! Level table management and per-user level assignment.

use super::levels::{default_levels, level_for_points, Level, LevelProgress, NewLevel};
use crate::leaderboards::RankingService;
use crate::storage::{AchievementStore, DatabaseError, LevelStore};

/// Manager for levels and assignments.
///
/// Point totals come from the ranking service, so the store must also
/// provide achievements.
pub struct LevelManager<'a, S: LevelStore + AchievementStore> {
    store: &'a S,
}

impl<'a, S: LevelStore + AchievementStore> LevelManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add a level. Thresholds are unique.
    pub fn create_level(&self, level: &NewLevel) -> Result<Level, LevelError> {
        if level.name.trim().is_empty() {
            return Err(LevelError::ValidationError(
                "Level name cannot be empty".to_string(),
            ));
        }

        let created = self.store.insert_level(level)?;
        tracing::info!(
            "Created level '{}' at {} points",
            created.name,
            created.points_required
        );
        Ok(created)
    }

    /// Every level, lowest threshold first.
    pub fn list_levels(&self) -> Result<Vec<Level>, LevelError> {
        Ok(self.store.all_levels()?)
    }

    /// Seed the default level table when no levels exist.
    ///
    /// Returns the number of levels inserted.
    pub fn initialize_levels(&self) -> Result<usize, LevelError> {
        if !self.store.all_levels()?.is_empty() {
            return Ok(0);
        }

        let defaults = default_levels();
        for level in &defaults {
            self.store.insert_level(level)?;
        }

        tracing::info!("Seeded {} default levels", defaults.len());
        Ok(defaults.len())
    }

    /// Store the level matching `points` as the user's current level.
    ///
    /// When no level qualifies the user's assignment is cleared.
    pub fn assign_level(&self, user_id: i64, points: i64) -> Result<Option<Level>, LevelError> {
        let levels = self.store.all_levels()?;

        match level_for_points(points, &levels) {
            Some(level) => {
                self.store.put_level_assignment(user_id, level.id)?;
                tracing::debug!(
                    "User {} assigned level '{}' with {} points",
                    user_id,
                    level.name,
                    points
                );
                Ok(Some(level.clone()))
            }
            None => {
                self.store.clear_level_assignment(user_id)?;
                tracing::warn!("No level matches {} points for user {}", points, user_id);
                Ok(None)
            }
        }
    }

    /// Reassign the user's level from their current point total.
    pub fn refresh_level(&self, user_id: i64) -> Result<Option<Level>, LevelError> {
        let points = RankingService::new(self.store).total_points(user_id)?;
        self.assign_level(user_id, points)
    }

    /// The user's stored level.
    pub fn current_level(&self, user_id: i64) -> Result<Option<Level>, LevelError> {
        let Some(level_id) = self.store.level_assignment(user_id)? else {
            return Ok(None);
        };

        Ok(self
            .store
            .all_levels()?
            .into_iter()
            .find(|level| level.id == level_id))
    }

    pub fn clear_assignment(&self, user_id: i64) -> Result<bool, LevelError> {
        Ok(self.store.clear_level_assignment(user_id)?)
    }

    /// Users whose current level is `level_id`.
    pub fn users_at_level(&self, level_id: i64) -> Result<Vec<i64>, LevelError> {
        Ok(self.store.users_at_level(level_id)?)
    }

    /// Where the user's point total sits in the level table.
    pub fn progress_for_user(&self, user_id: i64) -> Result<LevelProgress, LevelError> {
        let points = RankingService::new(self.store).total_points(user_id)?;
        let levels = self.store.all_levels()?;
        Ok(LevelProgress::compute(points, &levels))
    }
}

/// Level errors.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
