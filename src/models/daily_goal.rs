//! Daily goal model
//!
//! Goals are append-only. The current goal is the most recently created row;
//! "updating" a goal inserts a new one.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Calorie and protein targets for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalTargets {
    pub calorie_goal: f64,
    pub protein_goal: f64,
}

impl GoalTargets {
    pub fn new(calorie_goal: f64, protein_goal: f64) -> Self {
        Self {
            calorie_goal,
            protein_goal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyGoal {
    pub id: i64,
    pub user_id: i64,
    pub calorie_goal: f64,
    pub protein_goal: f64,
    /// Creation time; orders the goal history
    pub date: NaiveDateTime,
}

impl DailyGoal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            calorie_goal: row.get("calorie_goal")?,
            protein_goal: row.get("protein_goal")?,
            date: row.get("date")?,
        })
    }

    pub fn targets(&self) -> GoalTargets {
        GoalTargets::new(self.calorie_goal, self.protein_goal)
    }

    pub fn create(
        conn: &Connection,
        user_id: i64,
        targets: GoalTargets,
        date: NaiveDateTime,
    ) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO daily_goals (user_id, calorie_goal, protein_goal, date) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, targets.calorie_goal, targets.protein_goal, date],
        )?;

        let id = conn.last_insert_rowid();
        conn.query_row("SELECT * FROM daily_goals WHERE id = ?1", [id], Self::from_row)
            .map_err(DbError::from)
    }

    /// The current goal: latest by creation time, ties broken by insertion order
    pub fn latest(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM daily_goals WHERE user_id = ?1 ORDER BY date DESC, id DESC LIMIT 1",
        )?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(goal) => Ok(Some(goal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Goal history, newest first
    pub fn history(conn: &Connection, user_id: i64, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM daily_goals WHERE user_id = ?1 ORDER BY date DESC, id DESC LIMIT ?2",
        )?;

        let goals = stmt
            .query_map(params![user_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    pub fn count(conn: &Connection, user_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM daily_goals WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn delete_all_for_user(conn: &Connection, user_id: i64) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM daily_goals WHERE user_id = ?1", [user_id])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{test_conn, User};
    use chrono::NaiveDate;

    #[test]
    fn test_latest_uses_insertion_order_on_ties() {
        let conn = test_conn();
        let user = User::get_or_create(&conn, "u").unwrap();
        let ts = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();

        assert!(DailyGoal::latest(&conn, user.id).unwrap().is_none());

        DailyGoal::create(&conn, user.id, GoalTargets::new(2000.0, 150.0), ts).unwrap();
        let second = DailyGoal::create(&conn, user.id, GoalTargets::new(2300.0, 150.0), ts).unwrap();

        let latest = DailyGoal::latest(&conn, user.id).unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.targets(), GoalTargets::new(2300.0, 150.0));
        assert_eq!(DailyGoal::history(&conn, user.id, 10).unwrap().len(), 2);
    }
}
