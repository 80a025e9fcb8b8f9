//! SQLite storage for the social side of the tracker.
//!
//! Provides persistence for:
//! - Achievements and unlocks
//! - Per-user point totals
//! - Levels and level assignments
//! - Community memberships

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::database::{format_date, parse_date, Database, DatabaseError};
use super::traits::{AchievementStore, LevelStore, MembershipStore};
use crate::achievements::{Achievement, NewAchievement};
use crate::communities::{Membership, MembershipStatus};
use crate::leaderboards::UserPoints;
use crate::progression::{Level, NewLevel};

fn achievement_from_row(row: &rusqlite::Row) -> rusqlite::Result<Achievement> {
    Ok(Achievement {
        id: row.get(0)?,
        name: row.get(1)?,
        points: row.get(2)?,
        description: row.get(3)?,
    })
}

fn level_from_row(row: &rusqlite::Row) -> rusqlite::Result<Level> {
    Ok(Level {
        id: row.get(0)?,
        name: row.get(1)?,
        points_required: row.get(2)?,
        points_total: row.get(3)?,
    })
}

impl AchievementStore for Database {
    fn insert_achievement(&self, achievement: &NewAchievement) -> Result<Achievement, DatabaseError> {
        self.execute(
            "INSERT INTO achievements (name, points, description) VALUES (?1, ?2, ?3)",
            params![achievement.name, achievement.points, achievement.description],
        )?;

        Ok(Achievement {
            id: self.last_insert_id(),
            name: achievement.name.clone(),
            points: achievement.points,
            description: achievement.description.clone(),
        })
    }

    fn get_achievement(&self, achievement_id: i64) -> Result<Option<Achievement>, DatabaseError> {
        self.connection()
            .query_row(
                "SELECT id, name, points, description FROM achievements WHERE id = ?1",
                params![achievement_id],
                achievement_from_row,
            )
            .optional()
            .map_err(DatabaseError::from)
    }

    fn list_achievements(&self) -> Result<Vec<Achievement>, DatabaseError> {
        let mut stmt = self
            .connection()
            .prepare("SELECT id, name, points, description FROM achievements ORDER BY id ASC")?;

        let rows = stmt.query_map([], achievement_from_row)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::from)
    }

    fn unlock_achievement(&self, user_id: i64, achievement_id: i64) -> Result<bool, DatabaseError> {
        let inserted = self.execute(
            "INSERT OR IGNORE INTO achievement_unlocks (user_id, achievement_id, unlocked_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, achievement_id, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }

    fn achievements_for_user(&self, user_id: i64) -> Result<Vec<Achievement>, DatabaseError> {
        let mut stmt = self.connection().prepare(
            "SELECT a.id, a.name, a.points, a.description
             FROM achievements a
             JOIN achievement_unlocks u ON u.achievement_id = a.id
             WHERE u.user_id = ?1
             ORDER BY u.unlocked_at ASC, a.id ASC",
        )?;

        let rows = stmt.query_map(params![user_id], achievement_from_row)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::from)
    }

    fn user_point_totals(&self) -> Result<Vec<UserPoints>, DatabaseError> {
        let mut stmt = self.connection().prepare(
            "SELECT u.id, u.username, COALESCE(SUM(a.points), 0)
             FROM users u
             LEFT JOIN achievement_unlocks au ON au.user_id = u.id
             LEFT JOIN achievements a ON a.id = au.achievement_id
             GROUP BY u.id, u.username",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(UserPoints {
                user_id: row.get(0)?,
                username: row.get(1)?,
                points: row.get(2)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::from)
    }
}

impl LevelStore for Database {
    fn insert_level(&self, level: &NewLevel) -> Result<Level, DatabaseError> {
        self.execute(
            "INSERT INTO levels (name, points_required, points_total) VALUES (?1, ?2, ?3)",
            params![level.name, level.points_required, level.points_total],
        )?;

        Ok(Level {
            id: self.last_insert_id(),
            name: level.name.clone(),
            points_required: level.points_required,
            points_total: level.points_total,
        })
    }

    fn all_levels(&self) -> Result<Vec<Level>, DatabaseError> {
        let mut stmt = self.connection().prepare(
            "SELECT id, name, points_required, points_total FROM levels
             ORDER BY points_required ASC",
        )?;

        let rows = stmt.query_map([], level_from_row)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::from)
    }

    fn level_assignment(&self, user_id: i64) -> Result<Option<i64>, DatabaseError> {
        self.connection()
            .query_row(
                "SELECT level_id FROM level_assignments WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(DatabaseError::from)
    }

    fn put_level_assignment(&self, user_id: i64, level_id: i64) -> Result<(), DatabaseError> {
        self.execute(
            "INSERT INTO level_assignments (user_id, level_id, assigned_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                level_id = excluded.level_id,
                assigned_at = excluded.assigned_at",
            params![user_id, level_id, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn clear_level_assignment(&self, user_id: i64) -> Result<bool, DatabaseError> {
        let deleted = self.execute(
            "DELETE FROM level_assignments WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(deleted > 0)
    }

    fn users_at_level(&self, level_id: i64) -> Result<Vec<i64>, DatabaseError> {
        let mut stmt = self.connection().prepare(
            "SELECT user_id FROM level_assignments WHERE level_id = ?1 ORDER BY user_id ASC",
        )?;

        let rows = stmt.query_map(params![level_id], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(DatabaseError::from)
    }
}

/// Raw membership row before status and date parsing.
type MembershipRow = (i64, i64, String, String);

fn membership_row(row: &rusqlite::Row) -> rusqlite::Result<MembershipRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_membership(
    (user_id, community_id, status, joined_on): MembershipRow,
) -> Result<Membership, DatabaseError> {
    let status = MembershipStatus::from_str(&status).ok_or_else(|| {
        DatabaseError::DeserializationError(format!("Unknown membership status '{}'", status))
    })?;

    Ok(Membership {
        user_id,
        community_id,
        status,
        joined_on: parse_date(&joined_on)?,
    })
}

impl Database {
    fn query_memberships(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Membership>, DatabaseError> {
        let mut stmt = self.connection().prepare(sql)?;
        let rows = stmt.query_map(params, membership_row)?;

        let mut memberships = Vec::new();
        for row in rows {
            memberships.push(into_membership(row?)?);
        }
        Ok(memberships)
    }
}

impl MembershipStore for Database {
    fn community_creator(&self, community_id: i64) -> Result<Option<i64>, DatabaseError> {
        self.connection()
            .query_row(
                "SELECT creator_id FROM communities WHERE id = ?1",
                params![community_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(DatabaseError::from)
    }

    fn get_membership(
        &self,
        user_id: i64,
        community_id: i64,
    ) -> Result<Option<Membership>, DatabaseError> {
        let row = self
            .connection()
            .query_row(
                "SELECT user_id, community_id, status, joined_on FROM community_memberships
                 WHERE user_id = ?1 AND community_id = ?2",
                params![user_id, community_id],
                membership_row,
            )
            .optional()?;

        row.map(into_membership).transpose()
    }

    fn insert_membership(&self, membership: &Membership) -> Result<(), DatabaseError> {
        self.execute(
            "INSERT INTO community_memberships (user_id, community_id, status, joined_on)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                membership.user_id,
                membership.community_id,
                membership.status.as_str(),
                format_date(membership.joined_on),
            ],
        )?;
        Ok(())
    }

    fn update_membership_status(
        &self,
        user_id: i64,
        community_id: i64,
        status: MembershipStatus,
    ) -> Result<bool, DatabaseError> {
        let updated = self.execute(
            "UPDATE community_memberships SET status = ?1
             WHERE user_id = ?2 AND community_id = ?3",
            params![status.as_str(), user_id, community_id],
        )?;
        Ok(updated > 0)
    }

    fn delete_membership(&self, user_id: i64, community_id: i64) -> Result<bool, DatabaseError> {
        let deleted = self.execute(
            "DELETE FROM community_memberships WHERE user_id = ?1 AND community_id = ?2",
            params![user_id, community_id],
        )?;
        Ok(deleted > 0)
    }

    fn count_memberships(
        &self,
        community_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<u32, DatabaseError> {
        let count = match status {
            Some(status) => self.connection().query_row(
                "SELECT COUNT(*) FROM community_memberships
                 WHERE community_id = ?1 AND status = ?2",
                params![community_id, status.as_str()],
                |row| row.get(0),
            )?,
            None => self.connection().query_row(
                "SELECT COUNT(*) FROM community_memberships WHERE community_id = ?1",
                params![community_id],
                |row| row.get(0),
            )?,
        };
        Ok(count)
    }

    fn memberships_for_community(
        &self,
        community_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DatabaseError> {
        match status {
            Some(status) => self.query_memberships(
                "SELECT user_id, community_id, status, joined_on FROM community_memberships
                 WHERE community_id = ?1 AND status = ?2 ORDER BY user_id ASC",
                params![community_id, status.as_str()],
            ),
            None => self.query_memberships(
                "SELECT user_id, community_id, status, joined_on FROM community_memberships
                 WHERE community_id = ?1 ORDER BY user_id ASC",
                params![community_id],
            ),
        }
    }

    fn memberships_for_user(
        &self,
        user_id: i64,
        status: Option<MembershipStatus>,
    ) -> Result<Vec<Membership>, DatabaseError> {
        match status {
            Some(status) => self.query_memberships(
                "SELECT user_id, community_id, status, joined_on FROM community_memberships
                 WHERE user_id = ?1 AND status = ?2 ORDER BY community_id ASC",
                params![user_id, status.as_str()],
            ),
            None => self.query_memberships(
                "SELECT user_id, community_id, status, joined_on FROM community_memberships
                 WHERE user_id = ?1 ORDER BY community_id ASC",
                params![user_id],
            ),
        }
    }
}
