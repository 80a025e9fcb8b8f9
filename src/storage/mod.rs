//! Storage module for database and configuration.

pub mod config;
pub mod database;
pub mod memory;
pub mod schema;
pub mod social_store;
pub mod tracking_store;
pub mod traits;

pub use config::{load_config, load_config_from, save_config, AppConfig, ConfigError};
pub use database::{format_date, parse_date, parse_timestamp, Database, DatabaseError};
pub use memory::MemoryStore;
pub use traits::{AchievementStore, DailyStateStore, LevelStore, MembershipStore};
