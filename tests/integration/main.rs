//! Integration test modules.

mod community_membership_test;
mod habit_tracking_test;
mod progression_flow_test;
mod store_mock;
