//! Food model
//!
//! A food with calories and protein per unit, owned by one user. Every read
//! is scoped by `user_id`, so another user's food looks like a missing one.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::{local_now, Nutrients};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub calories_per_unit: f64,
    pub protein_per_unit: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data for creating a new food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodCreate {
    pub name: String,
    pub calories_per_unit: f64,
    pub protein_per_unit: f64,
}

/// Data for updating a food; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodUpdate {
    pub name: Option<String>,
    pub calories_per_unit: Option<f64>,
    pub protein_per_unit: Option<f64>,
}

impl FoodUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.calories_per_unit.is_none() && self.protein_per_unit.is_none()
    }
}

impl Food {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            calories_per_unit: row.get("calories_per_unit")?,
            protein_per_unit: row.get("protein_per_unit")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn per_unit(&self) -> Nutrients {
        Nutrients::new(self.calories_per_unit, self.protein_per_unit)
    }

    /// Insert a new food for a user
    pub fn create(conn: &Connection, user_id: i64, data: &FoodCreate) -> DbResult<Self> {
        let now = local_now();
        conn.execute(
            r#"
            INSERT INTO foods (user_id, name, calories_per_unit, protein_per_unit, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
            params![
                user_id,
                data.name,
                data.calories_per_unit,
                data.protein_per_unit,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get(conn, user_id, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a food owned by `user_id`
    pub fn get(conn: &Connection, user_id: i64, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods WHERE id = ?1 AND user_id = ?2")?;

        let result = stmt.query_row(params![id, user_id], Self::from_row);
        match result {
            Ok(food) => Ok(Some(food)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All foods of a user, alphabetical
    pub fn list(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM foods WHERE user_id = ?1 ORDER BY name COLLATE NOCASE ASC, id ASC",
        )?;

        let foods = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(foods)
    }

    /// Update the provided fields of a food. Returns `None` if the user does
    /// not own a food with this id.
    pub fn update(conn: &Connection, user_id: i64, id: i64, data: &FoodUpdate) -> DbResult<Option<Self>> {
        if data.is_empty() {
            return Self::get(conn, user_id, id);
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", stringify!($field), params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(name);
        add_update!(calories_per_unit);
        add_update!(protein_per_unit);

        updates.push(format!("updated_at = ?{}", params_vec.len() + 1));
        params_vec.push(Box::new(local_now()));

        let sql = format!(
            "UPDATE foods SET {} WHERE id = ?{} AND user_id = ?{}",
            updates.join(", "),
            params_vec.len() + 1,
            params_vec.len() + 2,
        );
        params_vec.push(Box::new(id));
        params_vec.push(Box::new(user_id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let rows = conn.execute(&sql, params_refs.as_slice())?;
        if rows == 0 {
            return Ok(None);
        }

        Self::get(conn, user_id, id)
    }

    /// Number of consumptions that reference this food
    pub fn consumption_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM consumptions WHERE food_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a food owned by `user_id`. Dependent consumptions must be
    /// removed first (see `Consumption::delete_for_food`).
    pub fn delete(conn: &Connection, user_id: i64, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM foods WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    pub fn delete_all_for_user(conn: &Connection, user_id: i64) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM foods WHERE user_id = ?1", [user_id])?)
    }
}
