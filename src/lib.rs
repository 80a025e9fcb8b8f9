//! Habitrack - Habit Tracking Core
//!
//! Habit scheduling and progress tracking backed by SQLite. Provides weekday
//! frequency matching, daily completion state, streaks, point-based levels,
//! a general ranking and community membership rules.

pub mod achievements;
pub mod communities;
pub mod habits;
pub mod leaderboards;
pub mod progression;
pub mod storage;
pub mod users;

// Re-export commonly used types
pub use achievements::AchievementManager;
pub use communities::{CommunityManager, MembershipRules};
pub use habits::{current_streak, is_due, DailyStateTracker, Frequency, HabitManager, HabitState};
pub use leaderboards::RankingService;
pub use progression::LevelManager;
pub use storage::{AppConfig, Database, MemoryStore};
pub use users::UserManager;
