//! Community membership rules.
//!
//! At most one membership row exists per (user, community). The creator of a
//! community is an active member without needing a row, and can never leave.
//! Status transitions are unrestricted.

use chrono::{NaiveDate, Utc};

use super::types::{Membership, MembershipStats, MembershipStatus};
use crate::storage::{DatabaseError, MembershipStore};

/// Join, leave and status rules over a membership store.
pub struct MembershipRules<'a, S: MembershipStore> {
    store: &'a S,
}

impl<'a, S: MembershipStore> MembershipRules<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn creator_of(&self, community_id: i64) -> Result<i64, MembershipError> {
        self.store
            .community_creator(community_id)?
            .ok_or(MembershipError::CommunityNotFound(community_id))
    }

    /// Join a community as an active member today.
    pub fn join(&self, user_id: i64, community_id: i64) -> Result<Membership, MembershipError> {
        self.join_on(user_id, community_id, Utc::now().date_naive())
    }

    /// Join a community as an active member on `date`.
    pub fn join_on(
        &self,
        user_id: i64,
        community_id: i64,
        date: NaiveDate,
    ) -> Result<Membership, MembershipError> {
        self.creator_of(community_id)?;

        if self.store.get_membership(user_id, community_id)?.is_some() {
            tracing::warn!(
                "User {} is already a member of community {}",
                user_id,
                community_id
            );
            return Err(MembershipError::AlreadyMember);
        }

        let membership = Membership {
            user_id,
            community_id,
            status: MembershipStatus::Activo,
            joined_on: date,
        };
        self.store.insert_membership(&membership)?;

        tracing::info!("User {} joined community {}", user_id, community_id);
        Ok(membership)
    }

    /// Leave a community, removing the membership row.
    pub fn leave(&self, user_id: i64, community_id: i64) -> Result<(), MembershipError> {
        if self.creator_of(community_id)? == user_id {
            tracing::warn!(
                "Creator {} cannot leave community {}",
                user_id,
                community_id
            );
            return Err(MembershipError::CreatorCannotLeave);
        }

        if !self.store.delete_membership(user_id, community_id)? {
            return Err(MembershipError::NotAMember);
        }

        tracing::info!("User {} left community {}", user_id, community_id);
        Ok(())
    }

    /// Overwrite the status of an existing membership.
    pub fn set_status(
        &self,
        user_id: i64,
        community_id: i64,
        status: MembershipStatus,
    ) -> Result<(), MembershipError> {
        self.creator_of(community_id)?;

        if !self
            .store
            .update_membership_status(user_id, community_id, status)?
        {
            return Err(MembershipError::NotAMember);
        }

        tracing::info!(
            "User {} in community {} is now {}",
            user_id,
            community_id,
            status.as_str()
        );
        Ok(())
    }

    /// Whether the user is the creator or holds an `activo` row.
    pub fn is_member_active(&self, user_id: i64, community_id: i64) -> Result<bool, MembershipError> {
        if self.creator_of(community_id)? == user_id {
            return Ok(true);
        }

        Ok(matches!(
            self.store.get_membership(user_id, community_id)?,
            Some(Membership {
                status: MembershipStatus::Activo,
                ..
            })
        ))
    }

    /// Whether the creator is counted without a row of their own.
    fn creator_is_implicit(&self, community_id: i64) -> Result<bool, MembershipError> {
        let creator = self.creator_of(community_id)?;
        Ok(self.store.get_membership(creator, community_id)?.is_none())
    }

    /// Number of members of a community.
    ///
    /// Without a filter this counts members in good standing, the same as
    /// filtering by `activo`. Both include the creator when they have no row.
    /// Any other filter counts the rows with that status.
    pub fn member_count(
        &self,
        community_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<u32, MembershipError> {
        let status = status.unwrap_or(MembershipStatus::Activo);
        let implicit = self.creator_is_implicit(community_id)?;
        let rows = self.store.count_memberships(community_id, Some(status))?;

        if status == MembershipStatus::Activo && implicit {
            return Ok(rows + 1);
        }
        Ok(rows)
    }

    /// Row totals per status, with the implicit creator added to `total`
    /// and `activo`.
    pub fn membership_stats(&self, community_id: i64) -> Result<MembershipStats, MembershipError> {
        let implicit = u32::from(self.creator_is_implicit(community_id)?);

        let mut stats = MembershipStats {
            total: self.store.count_memberships(community_id, None)? + implicit,
            ..MembershipStats::default()
        };

        for status in MembershipStatus::ALL {
            let count = self.store.count_memberships(community_id, Some(status))?;
            match status {
                MembershipStatus::Activo => stats.activo = count + implicit,
                MembershipStatus::Pendiente => stats.pendiente = count,
                MembershipStatus::Bloqueado => stats.bloqueado = count,
                MembershipStatus::Inactivo => stats.inactivo = count,
            }
        }

        Ok(stats)
    }

    /// Membership rows of a community, optionally filtered by status.
    pub fn members(
        &self,
        community_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, MembershipError> {
        self.creator_of(community_id)?;
        Ok(self.store.memberships_for_community(community_id, status)?)
    }

    /// A user's membership rows, optionally filtered by status.
    pub fn communities_of_user(
        &self,
        user_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, MembershipError> {
        Ok(self.store.memberships_for_user(user_id, status)?)
    }
}

/// Membership errors.
#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    #[error("Already a member")]
    AlreadyMember,

    #[error("Not a member")]
    NotAMember,

    #[error("The creator cannot leave their own community")]
    CreatorCannotLeave,

    #[error("Community not found: {0}")]
    CommunityNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
