//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: users, foods, consumptions and goal history
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- Owners of every other row
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        -- ============================================
        -- FOODS
        -- Nutrient values per unit, read at aggregation time
        -- ============================================
        CREATE TABLE foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL CHECK(length(trim(name)) > 0),
            calories_per_unit REAL NOT NULL CHECK(calories_per_unit >= 0),
            protein_per_unit REAL NOT NULL CHECK(protein_per_unit >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX idx_foods_user ON foods(user_id);

        -- ============================================
        -- CONSUMPTIONS
        -- Quantity only; nutrients come from the current food row
        -- consumed_at is local wall-clock time
        -- ============================================
        CREATE TABLE consumptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            food_id INTEGER NOT NULL REFERENCES foods(id) ON DELETE CASCADE,
            quantity REAL NOT NULL,
            consumed_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX idx_consumptions_user_time ON consumptions(user_id, consumed_at);
        CREATE INDEX idx_consumptions_food ON consumptions(food_id);

        -- ============================================
        -- DAILY GOALS
        -- Append-only history; latest row is the current goal
        -- ============================================
        CREATE TABLE daily_goals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            calorie_goal REAL NOT NULL,
            protein_goal REAL NOT NULL,
            date TEXT NOT NULL
        );

        CREATE INDEX idx_daily_goals_user_date ON daily_goals(user_id, date);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version; 0 before the first migration
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let tracked: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
        [],
        |row| row.get(0),
    )?;
    if !tracked {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
