//! Achievements module
//!
//! Point-valued achievements and the per-user unlocks that feed the ranking.

pub mod manager;

pub use manager::{Achievement, AchievementError, AchievementManager, NewAchievement};
