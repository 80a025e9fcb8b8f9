//! Leaderboards module
//!
//! Ranks users by the points of their unlocked achievements.

pub mod rankings;

// Re-export commonly used types
pub use rankings::{RankPosition, RankingEntry, RankingService, UserPoints};
