//! Consumption model
//!
//! One logged instance of eating a quantity of a food. Only the quantity is
//! stored; nutrient values are joined from the current food row on every read.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::{local_now, nutrient_contribution, Nutrients};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consumption {
    pub id: i64,
    pub user_id: i64,
    pub food_id: i64,
    pub quantity: f64,
    /// Local wall-clock time of consumption
    pub consumed_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// Current per-unit values of the consumed food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRef {
    pub name: String,
    pub calories_per_unit: f64,
    pub protein_per_unit: f64,
}

impl FoodRef {
    pub fn per_unit(&self) -> Nutrients {
        Nutrients::new(self.calories_per_unit, self.protein_per_unit)
    }
}

/// Consumption joined with its food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionDetail {
    pub id: i64,
    pub food_id: i64,
    pub quantity: f64,
    pub consumed_at: NaiveDateTime,
    pub food: FoodRef,
}

impl ConsumptionDetail {
    pub fn contribution(&self) -> Nutrients {
        nutrient_contribution(self.food.per_unit(), self.quantity)
    }
}

/// Data for logging a consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionCreate {
    pub food_id: i64,
    pub quantity: f64,
    pub consumed_at: NaiveDateTime,
}

const DETAIL_SELECT: &str = r#"
    SELECT c.id, c.food_id, c.quantity, c.consumed_at,
           f.name AS food_name, f.calories_per_unit, f.protein_per_unit
    FROM consumptions c
    INNER JOIN foods f ON f.id = c.food_id
"#;

impl Consumption {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food_id: row.get("food_id")?,
            quantity: row.get("quantity")?,
            consumed_at: row.get("consumed_at")?,
            created_at: row.get("created_at")?,
        })
    }

    fn detail_from_row(row: &Row) -> rusqlite::Result<ConsumptionDetail> {
        Ok(ConsumptionDetail {
            id: row.get("id")?,
            food_id: row.get("food_id")?,
            quantity: row.get("quantity")?,
            consumed_at: row.get("consumed_at")?,
            food: FoodRef {
                name: row.get("food_name")?,
                calories_per_unit: row.get("calories_per_unit")?,
                protein_per_unit: row.get("protein_per_unit")?,
            },
        })
    }

    /// Insert a consumption. Food ownership is checked by the caller.
    pub fn create(conn: &Connection, user_id: i64, data: &ConsumptionCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO consumptions (user_id, food_id, quantity, consumed_at, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![user_id, data.food_id, data.quantity, data.consumed_at, local_now()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get(conn, user_id, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get(conn: &Connection, user_id: i64, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM consumptions WHERE id = ?1 AND user_id = ?2")?;

        let result = stmt.query_row(params![id, user_id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_detail(conn: &Connection, user_id: i64, id: i64) -> DbResult<Option<ConsumptionDetail>> {
        let sql = format!("{} WHERE c.id = ?1 AND c.user_id = ?2", DETAIL_SELECT);
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row(params![id, user_id], Self::detail_from_row);
        match result {
            Ok(detail) => Ok(Some(detail)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Consumptions with `start <= consumed_at < end`, oldest first
    pub fn list_between(
        conn: &Connection,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> DbResult<Vec<ConsumptionDetail>> {
        let sql = format!(
            "{} WHERE c.user_id = ?1 AND c.consumed_at >= ?2 AND c.consumed_at < ?3 ORDER BY c.consumed_at ASC, c.id ASC",
            DETAIL_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;

        let entries = stmt
            .query_map(params![user_id, start, end], Self::detail_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete one consumption owned by `user_id`
    pub fn delete(conn: &Connection, user_id: i64, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM consumptions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    pub fn delete_for_food(conn: &Connection, food_id: i64) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM consumptions WHERE food_id = ?1", [food_id])?)
    }

    pub fn delete_all_for_user(conn: &Connection, user_id: i64) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM consumptions WHERE user_id = ?1", [user_id])?)
    }
}
