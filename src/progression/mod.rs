//! Points and level progression.
//!
//! Maps a user's point total onto the level table and keeps their single
//! current level assignment.

pub mod levels;
pub mod manager;

pub use levels::{
    default_levels, level_for_points, next_level, progress_percent, Level, LevelProgress,
    NewLevel,
};
pub use manager::{LevelError, LevelManager};
