//! User model
//!
//! Owner of foods, consumptions and goals.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::local_now;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let user = conn
            .query_row("SELECT * FROM users WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(user)
    }

    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let user = conn
            .query_row("SELECT * FROM users WHERE name = ?1", [name], Self::from_row)
            .optional()?;
        Ok(user)
    }

    /// Look up a user by name, creating it on first use
    pub fn get_or_create(conn: &Connection, name: &str) -> DbResult<Self> {
        conn.execute(
            "INSERT OR IGNORE INTO users (name, created_at) VALUES (?1, ?2)",
            params![name, local_now()],
        )?;

        Self::get_by_name(conn, name)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Delete the user row only. Dependents must be removed first.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_get_or_create_is_stable() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let first = User::get_or_create(&conn, "sam").unwrap();
        let again = User::get_or_create(&conn, "sam").unwrap();
        let other = User::get_or_create(&conn, "alex").unwrap();

        assert_eq!(first.id, again.id);
        assert_ne!(first.id, other.id);
        assert!(User::get_by_id(&conn, first.id).unwrap().is_some());
    }
}
