//! Community and membership type definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A community created by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Creator, implicitly an active member
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating or updating a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommunity {
    pub name: String,
    pub description: Option<String>,
}

impl NewCommunity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Standing of a membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Member in good standing
    Activo,
    /// Awaiting approval
    Pendiente,
    Bloqueado,
    Inactivo,
}

impl MembershipStatus {
    pub const ALL: [MembershipStatus; 4] = [
        MembershipStatus::Activo,
        MembershipStatus::Pendiente,
        MembershipStatus::Bloqueado,
        MembershipStatus::Inactivo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Activo => "activo",
            MembershipStatus::Pendiente => "pendiente",
            MembershipStatus::Bloqueado => "bloqueado",
            MembershipStatus::Inactivo => "inactivo",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "activo" => Some(MembershipStatus::Activo),
            "pendiente" => Some(MembershipStatus::Pendiente),
            "bloqueado" => Some(MembershipStatus::Bloqueado),
            "inactivo" => Some(MembershipStatus::Inactivo),
            _ => None,
        }
    }
}

/// Membership row for a (user, community) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: i64,
    pub community_id: i64,
    pub status: MembershipStatus,
    pub joined_on: NaiveDate,
}

/// Membership totals for a community.
///
/// The creator is counted in `total` and `activo` when they have no row of
/// their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MembershipStats {
    pub total: u32,
    pub activo: u32,
    pub pendiente: u32,
    pub bloqueado: u32,
    pub inactivo: u32,
}
