//! User and profile management.
//!
//! A user is the root of everything they own: deleting one cascades to
//! their habits, tracked states, profile, memberships, unlocks and level.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::types::{NewUser, User, UserProfile};
use crate::storage::{format_date, parse_date, parse_timestamp, Database, DatabaseError};

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, birth_date, sex, created_at, updated_at";

/// Manager for users and their profiles.
pub struct UserManager<'a> {
    db: &'a Database,
}

impl<'a> UserManager<'a> {
    /// Create a new user manager.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a user. Usernames are unique.
    pub fn create_user(&self, user: &NewUser) -> Result<User, UserError> {
        validate(user)?;
        if self.get_user_by_username(&user.username)?.is_some() {
            return Err(UserError::UsernameTaken(user.username.clone()));
        }

        let now = Utc::now();
        self.db.execute(
            "INSERT INTO users (username, first_name, last_name, birth_date, sex, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.username,
                user.first_name,
                user.last_name,
                user.birth_date.map(format_date),
                user.sex,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        let created = User {
            id: self.db.last_insert_id(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            birth_date: user.birth_date,
            sex: user.sex.clone(),
            created_at: now,
            updated_at: now,
        };

        tracing::info!("Created user {} ({})", created.username, created.id);
        Ok(created)
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>, UserError> {
        let row = self
            .db
            .connection()
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                UserRow::from_row,
            )
            .optional()?;

        row.map(UserRow::into_user).transpose()
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let row = self
            .db
            .connection()
            .query_row(
                &format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS),
                params![username],
                UserRow::from_row,
            )
            .optional()?;

        row.map(UserRow::into_user).transpose()
    }

    /// All users in registration order.
    pub fn list_users(&self) -> Result<Vec<User>, UserError> {
        let mut stmt = self
            .db
            .connection()
            .prepare(&format!("SELECT {} FROM users ORDER BY id ASC", USER_COLUMNS))?;

        let rows = stmt.query_map([], UserRow::from_row)?;

        rows.collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(UserRow::into_user)
            .collect()
    }

    /// Replace a user's fields.
    pub fn update_user(&self, id: i64, user: &NewUser) -> Result<User, UserError> {
        validate(user)?;
        if let Some(existing) = self.get_user_by_username(&user.username)? {
            if existing.id != id {
                return Err(UserError::UsernameTaken(user.username.clone()));
            }
        }

        let updated = self.db.execute(
            "UPDATE users SET username = ?1, first_name = ?2, last_name = ?3,
             birth_date = ?4, sex = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                user.username,
                user.first_name,
                user.last_name,
                user.birth_date.map(format_date),
                user.sex,
                Utc::now().to_rfc3339(),
                id,
            ],
        )?;

        if updated == 0 {
            return Err(UserError::NotFound(id));
        }

        self.get_user(id)?.ok_or(UserError::NotFound(id))
    }

    /// Delete a user and everything they own.
    pub fn delete_user(&self, id: i64) -> Result<bool, UserError> {
        let deleted = self.db.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if deleted > 0 {
            tracing::info!("Deleted user {}", id);
        }
        Ok(deleted > 0)
    }

    pub fn count_users(&self) -> Result<u32, UserError> {
        let count: u32 = self
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    // ---- Profiles ----

    /// Insert or replace a user's profile.
    pub fn upsert_profile(&self, profile: &UserProfile) -> Result<(), UserError> {
        if self.get_user(profile.user_id)?.is_none() {
            return Err(UserError::NotFound(profile.user_id));
        }

        self.db.execute(
            "INSERT INTO user_profiles (user_id, weight_kg, height, age, occupation, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id) DO UPDATE SET
                weight_kg = excluded.weight_kg,
                height = excluded.height,
                age = excluded.age,
                occupation = excluded.occupation,
                updated_at = excluded.updated_at",
            params![
                profile.user_id,
                profile.weight_kg,
                profile.height,
                profile.age,
                profile.occupation,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    pub fn get_profile(&self, user_id: i64) -> Result<Option<UserProfile>, UserError> {
        self.db
            .connection()
            .query_row(
                "SELECT user_id, weight_kg, height, age, occupation
                 FROM user_profiles WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(UserProfile {
                        user_id: row.get(0)?,
                        weight_kg: row.get(1)?,
                        height: row.get(2)?,
                        age: row.get(3)?,
                        occupation: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(UserError::from)
    }

    pub fn delete_profile(&self, user_id: i64) -> Result<bool, UserError> {
        let deleted = self
            .db
            .execute("DELETE FROM user_profiles WHERE user_id = ?1", params![user_id])?;
        Ok(deleted > 0)
    }

    /// Body mass index from the user's profile, if it has the data.
    pub fn bmi(&self, user_id: i64) -> Result<Option<f64>, UserError> {
        Ok(self.get_profile(user_id)?.and_then(|profile| profile.bmi()))
    }
}

fn validate(user: &NewUser) -> Result<(), UserError> {
    if user.username.trim().is_empty() {
        return Err(UserError::ValidationError(
            "Username cannot be empty".to_string(),
        ));
    }
    if user.first_name.trim().is_empty() || user.last_name.trim().is_empty() {
        return Err(UserError::ValidationError(
            "First and last name are required".to_string(),
        ));
    }
    Ok(())
}

struct UserRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    birth_date: Option<String>,
    sex: Option<String>,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            birth_date: row.get(4)?,
            sex: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn into_user(self) -> Result<User, UserError> {
        Ok(User {
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date.as_deref().map(parse_date).transpose()?,
            sex: self.sex,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// User errors.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for UserError {
    fn from(error: rusqlite::Error) -> Self {
        UserError::Database(error.into())
    }
}
