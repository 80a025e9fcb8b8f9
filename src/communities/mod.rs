//! Communities module
//!
//! Provides community creation and tagging plus the membership rules.

pub mod manager;
pub mod membership;
pub mod types;

// Re-export commonly used types
pub use manager::{CommunityError, CommunityManager};
pub use membership::{MembershipError, MembershipRules};
pub use types::*;
