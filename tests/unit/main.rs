//! Unit test modules.

mod frequency_test;
mod level_progression_test;
mod ranking_test;
mod streak_test;
