//! Achievement catalog and unlocks.
//!
//! Unlocks are monotonic: once a user holds an achievement it is never
//! removed, and unlocking it again is a no-op.

use serde::{Deserialize, Serialize};

use crate::storage::{AchievementStore, DatabaseError};

/// Achievement definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    /// Points granted when unlocked
    pub points: i64,
    pub description: Option<String>,
}

/// Fields for a new achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAchievement {
    pub name: String,
    pub points: i64,
    pub description: Option<String>,
}

impl NewAchievement {
    pub fn new(name: impl Into<String>, points: i64) -> Self {
        Self {
            name: name.into(),
            points,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Achievement manager.
pub struct AchievementManager<'a, S: AchievementStore> {
    store: &'a S,
}

impl<'a, S: AchievementStore> AchievementManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add an achievement to the catalog.
    pub fn create_achievement(
        &self,
        achievement: &NewAchievement,
    ) -> Result<Achievement, AchievementError> {
        if achievement.name.trim().is_empty() {
            return Err(AchievementError::ValidationError(
                "Achievement name cannot be empty".to_string(),
            ));
        }
        if achievement.points < 0 {
            return Err(AchievementError::ValidationError(format!(
                "Achievement points must be non-negative, got {}",
                achievement.points
            )));
        }

        let created = self.store.insert_achievement(achievement)?;
        tracing::info!(
            "Created achievement '{}' ({}) worth {} points",
            created.name,
            created.id,
            created.points
        );
        Ok(created)
    }

    pub fn get_achievement(&self, id: i64) -> Result<Option<Achievement>, AchievementError> {
        Ok(self.store.get_achievement(id)?)
    }

    pub fn list_achievements(&self) -> Result<Vec<Achievement>, AchievementError> {
        Ok(self.store.list_achievements()?)
    }

    /// Unlock an achievement for a user.
    ///
    /// Returns `false` when the user already had it.
    pub fn unlock(&self, user_id: i64, achievement_id: i64) -> Result<bool, AchievementError> {
        let achievement = self
            .store
            .get_achievement(achievement_id)?
            .ok_or(AchievementError::NotFound(achievement_id))?;

        let unlocked = self.store.unlock_achievement(user_id, achievement_id)?;
        if unlocked {
            tracing::info!(
                "User {} unlocked '{}' (+{} points)",
                user_id,
                achievement.name,
                achievement.points
            );
        } else {
            tracing::debug!(
                "User {} already holds achievement {}",
                user_id,
                achievement_id
            );
        }

        Ok(unlocked)
    }

    /// Achievements the user has unlocked.
    pub fn unlocked_for_user(&self, user_id: i64) -> Result<Vec<Achievement>, AchievementError> {
        Ok(self.store.achievements_for_user(user_id)?)
    }
}

/// Achievement errors.
#[derive(Debug, thiserror::Error)]
pub enum AchievementError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Achievement not found: {0}")]
    NotFound(i64),
}
