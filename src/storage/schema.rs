//! Database schema definitions for habitrack.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    birth_date TEXT,
    sex TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Optional 1:1 profile
CREATE TABLE IF NOT EXISTS user_profiles (
    user_id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    weight_kg REAL,
    height REAL,
    age INTEGER,
    occupation TEXT,
    updated_at TEXT NOT NULL
);

-- Categories table
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

-- Habits table
CREATE TABLE IF NOT EXISTS habits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    frequency TEXT NOT NULL,
    category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    created_on TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_habits_user_id ON habits(user_id);

-- Daily completion state, one row per (user, habit, date)
CREATE TABLE IF NOT EXISTS daily_states (
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    habit_id INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    state TEXT NOT NULL CHECK (state IN ('pending', 'completed')),
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, habit_id, date)
);

CREATE INDEX IF NOT EXISTS idx_daily_states_habit_date ON daily_states(habit_id, date);

-- Communities table
CREATE TABLE IF NOT EXISTS communities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    creator_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

-- Community category tags
CREATE TABLE IF NOT EXISTS community_categories (
    community_id INTEGER NOT NULL REFERENCES communities(id) ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    PRIMARY KEY (community_id, category_id)
);

-- Community memberships
CREATE TABLE IF NOT EXISTS community_memberships (
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    community_id INTEGER NOT NULL REFERENCES communities(id) ON DELETE CASCADE,
    status TEXT NOT NULL CHECK (status IN ('activo', 'pendiente', 'bloqueado', 'inactivo')),
    joined_on TEXT NOT NULL,
    PRIMARY KEY (user_id, community_id)
);

CREATE INDEX IF NOT EXISTS idx_community_memberships_community ON community_memberships(community_id, status);

-- Achievements table
CREATE TABLE IF NOT EXISTS achievements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    points INTEGER NOT NULL,
    description TEXT
);

-- Achievement unlocks
CREATE TABLE IF NOT EXISTS achievement_unlocks (
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    achievement_id INTEGER NOT NULL REFERENCES achievements(id) ON DELETE CASCADE,
    unlocked_at TEXT NOT NULL,
    PRIMARY KEY (user_id, achievement_id)
);

-- Levels table
CREATE TABLE IF NOT EXISTS levels (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    points_required INTEGER NOT NULL UNIQUE,
    points_total INTEGER NOT NULL DEFAULT 0
);

-- Current level per user
CREATE TABLE IF NOT EXISTS level_assignments (
    user_id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    level_id INTEGER NOT NULL REFERENCES levels(id) ON DELETE CASCADE,
    assigned_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_level_assignments_level ON level_assignments(level_id);
"#;

/// Schema version table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;
