//! Community management.
//!
//! Creation, lookup and category tagging of communities. Membership lives
//! in [`MembershipRules`](super::membership::MembershipRules).

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::types::{Community, NewCommunity};
use crate::habits::Category;
use crate::storage::{parse_timestamp, Database, DatabaseError};

/// Community manager.
pub struct CommunityManager<'a> {
    db: &'a Database,
}

impl<'a> CommunityManager<'a> {
    /// Create a new community manager.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a community tagged with the given categories.
    ///
    /// The creator gets no membership row; they are a member implicitly.
    /// An unknown category id fails before anything is written.
    pub fn create_community(
        &self,
        creator_id: i64,
        community: &NewCommunity,
        category_ids: &[i64],
    ) -> Result<Community, CommunityError> {
        validate_name(&community.name)?;
        for category_id in category_ids {
            if !self.category_exists(*category_id)? {
                return Err(CommunityError::ValidationError(format!(
                    "Unknown category: {}",
                    category_id
                )));
            }
        }
        let now = Utc::now();

        self.db.execute(
            "INSERT INTO communities (name, description, creator_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                community.name,
                community.description,
                creator_id,
                now.to_rfc3339(),
            ],
        )?;
        let id = self.db.last_insert_id();

        for category_id in category_ids {
            self.add_category(id, *category_id)?;
        }

        tracing::info!(
            "User {} created community '{}' ({})",
            creator_id,
            community.name,
            id
        );

        Ok(Community {
            id,
            name: community.name.clone(),
            description: community.description.clone(),
            creator_id,
            created_at: now,
        })
    }

    pub fn get_community(&self, id: i64) -> Result<Option<Community>, CommunityError> {
        let row = self
            .db
            .connection()
            .query_row(
                "SELECT id, name, description, creator_id, created_at
                 FROM communities WHERE id = ?1",
                params![id],
                CommunityRow::from_row,
            )
            .optional()?;

        row.map(CommunityRow::into_community).transpose()
    }

    /// All communities in creation order.
    pub fn list_communities(&self) -> Result<Vec<Community>, CommunityError> {
        self.query_communities(
            "SELECT id, name, description, creator_id, created_at
             FROM communities ORDER BY id ASC",
            params![],
        )
    }

    pub fn communities_by_creator(&self, creator_id: i64) -> Result<Vec<Community>, CommunityError> {
        self.query_communities(
            "SELECT id, name, description, creator_id, created_at
             FROM communities WHERE creator_id = ?1 ORDER BY id ASC",
            params![creator_id],
        )
    }

    /// Communities tagged with a category.
    pub fn communities_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Community>, CommunityError> {
        self.query_communities(
            "SELECT c.id, c.name, c.description, c.creator_id, c.created_at
             FROM communities c
             JOIN community_categories cc ON cc.community_id = c.id
             WHERE cc.category_id = ?1
             ORDER BY c.id ASC",
            params![category_id],
        )
    }

    /// Communities whose name contains `query`, ignoring case.
    pub fn search_by_name(&self, query: &str) -> Result<Vec<Community>, CommunityError> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .list_communities()?
            .into_iter()
            .filter(|community| community.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Replace name and description.
    pub fn update_community(
        &self,
        id: i64,
        community: &NewCommunity,
    ) -> Result<Community, CommunityError> {
        validate_name(&community.name)?;

        let updated = self.db.execute(
            "UPDATE communities SET name = ?1, description = ?2 WHERE id = ?3",
            params![community.name, community.description, id],
        )?;
        if updated == 0 {
            return Err(CommunityError::NotFound(id));
        }

        self.get_community(id)?.ok_or(CommunityError::NotFound(id))
    }

    /// Delete a community with its memberships and tags.
    pub fn delete_community(&self, id: i64) -> Result<bool, CommunityError> {
        let deleted = self
            .db
            .execute("DELETE FROM communities WHERE id = ?1", params![id])?;
        if deleted > 0 {
            tracing::info!("Deleted community {}", id);
        }
        Ok(deleted > 0)
    }

    /// Tag a community. Returns `false` if already tagged.
    pub fn add_category(&self, community_id: i64, category_id: i64) -> Result<bool, CommunityError> {
        let inserted = self.db.execute(
            "INSERT OR IGNORE INTO community_categories (community_id, category_id)
             VALUES (?1, ?2)",
            params![community_id, category_id],
        )?;
        Ok(inserted > 0)
    }

    pub fn remove_category(
        &self,
        community_id: i64,
        category_id: i64,
    ) -> Result<bool, CommunityError> {
        let deleted = self.db.execute(
            "DELETE FROM community_categories WHERE community_id = ?1 AND category_id = ?2",
            params![community_id, category_id],
        )?;
        Ok(deleted > 0)
    }

    /// Categories a community is tagged with, by name.
    pub fn categories_of(&self, community_id: i64) -> Result<Vec<Category>, CommunityError> {
        let mut stmt = self.db.connection().prepare(
            "SELECT c.id, c.name
             FROM categories c
             JOIN community_categories cc ON cc.category_id = c.id
             WHERE cc.community_id = ?1
             ORDER BY c.name ASC",
        )?;

        let rows = stmt.query_map(params![community_id], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(CommunityError::from)
    }

    fn category_exists(&self, category_id: i64) -> Result<bool, CommunityError> {
        let count: i64 = self.db.connection().query_row(
            "SELECT COUNT(*) FROM categories WHERE id = ?1",
            params![category_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn query_communities(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Community>, CommunityError> {
        let mut stmt = self.db.connection().prepare(sql)?;
        let rows = stmt.query_map(params, CommunityRow::from_row)?;

        rows.collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(CommunityRow::into_community)
            .collect()
    }
}

fn validate_name(name: &str) -> Result<(), CommunityError> {
    if name.trim().is_empty() {
        return Err(CommunityError::ValidationError(
            "Community name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

struct CommunityRow {
    id: i64,
    name: String,
    description: Option<String>,
    creator_id: i64,
    created_at: String,
}

impl CommunityRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            creator_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_community(self) -> Result<Community, CommunityError> {
        Ok(Community {
            id: self.id,
            name: self.name,
            description: self.description,
            creator_id: self.creator_id,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Community errors.
#[derive(Debug, thiserror::Error)]
pub enum CommunityError {
    #[error("Community not found: {0}")]
    NotFound(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for CommunityError {
    fn from(error: rusqlite::Error) -> Self {
        CommunityError::Database(error.into())
    }
}
