//! Users module
//!
//! Registered users and their optional physical profile.

pub mod manager;
pub mod types;

pub use manager::{UserError, UserManager};
pub use types::{NewUser, User, UserProfile};
