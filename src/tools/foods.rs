//! Food tools
//!
//! Create, list, inspect, edit and delete the user's foods. Edits apply to
//! every past consumption of the food, since nutrients are never snapshotted.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::error::{ensure_non_negative, TrackerError, TrackerResult};
use crate::models::{Consumption, Food, FoodCreate, FoodUpdate};

/// Food as returned by the tools
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub id: i64,
    pub name: String,
    pub calories_per_unit: f64,
    pub protein_per_unit: f64,
    pub updated_at: String,
}

impl From<&Food> for FoodSummary {
    fn from(food: &Food) -> Self {
        Self {
            id: food.id,
            name: food.name.clone(),
            calories_per_unit: food.calories_per_unit,
            protein_per_unit: food.protein_per_unit,
            updated_at: food.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FoodDetail {
    #[serde(flatten)]
    pub food: FoodSummary,
    pub created_at: String,
    /// Consumptions that reference this food
    pub usage_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub foods: Vec<FoodSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteFoodResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub consumptions_removed: usize,
}

fn validate_name(name: &str) -> TrackerResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrackerError::validation("food name cannot be empty"));
    }
    Ok(name.to_string())
}

pub fn add_food(db: &Database, user_id: i64, data: FoodCreate) -> TrackerResult<FoodSummary> {
    let name = validate_name(&data.name)?;
    ensure_non_negative("calories_per_unit", data.calories_per_unit)?;
    ensure_non_negative("protein_per_unit", data.protein_per_unit)?;

    let data = FoodCreate { name, ..data };
    let food = db.with_conn(|conn| Food::create(conn, user_id, &data))?;

    info!(user_id, food_id = food.id, name = %food.name, "food added");
    Ok(FoodSummary::from(&food))
}

pub fn list_foods(db: &Database, user_id: i64) -> TrackerResult<ListFoodsResponse> {
    let foods = db.with_conn(|conn| Food::list(conn, user_id))?;
    let foods: Vec<FoodSummary> = foods.iter().map(FoodSummary::from).collect();
    let total = foods.len();
    Ok(ListFoodsResponse { foods, total })
}

pub fn get_food(db: &Database, user_id: i64, id: i64) -> TrackerResult<FoodDetail> {
    let (food, usage_count) = db.with_conn(|conn| {
        let food = Food::get(conn, user_id, id)?;
        let usage = match &food {
            Some(f) => Food::consumption_count(conn, f.id)?,
            None => 0,
        };
        Ok((food, usage))
    })?;

    let food = food.ok_or_else(|| TrackerError::not_found(format!("food {}", id)))?;
    Ok(FoodDetail {
        created_at: food.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        food: FoodSummary::from(&food),
        usage_count,
    })
}

/// Partial update; only provided fields change
pub fn update_food(db: &Database, user_id: i64, id: i64, data: FoodUpdate) -> TrackerResult<FoodSummary> {
    let name = data.name.as_deref().map(validate_name).transpose()?;
    if let Some(calories) = data.calories_per_unit {
        ensure_non_negative("calories_per_unit", calories)?;
    }
    if let Some(protein) = data.protein_per_unit {
        ensure_non_negative("protein_per_unit", protein)?;
    }

    let data = FoodUpdate { name, ..data };
    let food = db
        .with_conn(|conn| Food::update(conn, user_id, id, &data))?
        .ok_or_else(|| TrackerError::not_found(format!("food {}", id)))?;

    info!(user_id, food_id = id, "food updated");
    Ok(FoodSummary::from(&food))
}

/// Delete a food and its consumptions in one transaction
pub fn delete_food(db: &Database, user_id: i64, id: i64) -> TrackerResult<DeleteFoodResponse> {
    let removed = db.with_transaction(|tx| -> TrackerResult<usize> {
        if Food::get(tx, user_id, id)?.is_none() {
            return Err(TrackerError::not_found(format!("food {}", id)));
        }
        let removed = Consumption::delete_for_food(tx, id)?;
        Food::delete(tx, user_id, id)?;
        Ok(removed)
    })?;

    info!(user_id, food_id = id, consumptions_removed = removed, "food deleted");
    Ok(DeleteFoodResponse {
        success: true,
        deleted_id: id,
        consumptions_removed: removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsumptionCreate, User};
    use chrono::NaiveDate;

    fn setup() -> (tempfile::TempDir, Database, i64) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("foods.db")).unwrap();
        let user_id = db.with_conn(|conn| User::get_or_create(conn, "alice")).unwrap().id;
        (dir, db, user_id)
    }

    fn oats() -> FoodCreate {
        FoodCreate {
            name: "  Oats ".to_string(),
            calories_per_unit: 150.0,
            protein_per_unit: 5.0,
        }
    }

    #[test]
    fn test_add_food_trims_and_validates() {
        let (_dir, db, user_id) = setup();
        let food = add_food(&db, user_id, oats()).unwrap();
        assert_eq!(food.name, "Oats");

        let blank = FoodCreate { name: "   ".to_string(), ..oats() };
        assert!(matches!(add_food(&db, user_id, blank), Err(TrackerError::Validation(_))));

        let negative = FoodCreate { protein_per_unit: -1.0, ..oats() };
        assert!(matches!(add_food(&db, user_id, negative), Err(TrackerError::Validation(_))));

        let zero = FoodCreate { calories_per_unit: 0.0, protein_per_unit: 0.0, ..oats() };
        assert!(add_food(&db, user_id, zero).is_ok());
    }

    #[test]
    fn test_foreign_food_is_not_found() {
        let (_dir, db, user_id) = setup();
        let other = db.with_conn(|conn| User::get_or_create(conn, "mallory")).unwrap().id;
        let food = add_food(&db, user_id, oats()).unwrap();

        assert!(matches!(get_food(&db, other, food.id), Err(TrackerError::NotFound(_))));
        assert!(matches!(delete_food(&db, other, food.id), Err(TrackerError::NotFound(_))));
        let update = FoodUpdate { calories_per_unit: Some(1.0), ..Default::default() };
        assert!(matches!(update_food(&db, other, food.id, update), Err(TrackerError::NotFound(_))));
        assert_eq!(list_foods(&db, other).unwrap().total, 0);
    }

    #[test]
    fn test_update_rejects_invalid_values() {
        let (_dir, db, user_id) = setup();
        let food = add_food(&db, user_id, oats()).unwrap();

        let bad = FoodUpdate { calories_per_unit: Some(f64::NAN), ..Default::default() };
        assert!(matches!(update_food(&db, user_id, food.id, bad), Err(TrackerError::Validation(_))));

        let good = FoodUpdate { protein_per_unit: Some(6.5), ..Default::default() };
        let updated = update_food(&db, user_id, food.id, good).unwrap();
        assert_eq!(updated.protein_per_unit, 6.5);
        assert_eq!(updated.calories_per_unit, 150.0);
    }

    #[test]
    fn test_delete_food_removes_consumptions() {
        let (_dir, db, user_id) = setup();
        let food = add_food(&db, user_id, oats()).unwrap();
        let at = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap().and_hms_opt(8, 0, 0).unwrap();
        for _ in 0..2 {
            db.with_conn(|conn| {
                Consumption::create(conn, user_id, &ConsumptionCreate {
                    food_id: food.id,
                    quantity: 1.0,
                    consumed_at: at,
                })
            })
            .unwrap();
        }

        assert_eq!(get_food(&db, user_id, food.id).unwrap().usage_count, 2);

        let result = delete_food(&db, user_id, food.id).unwrap();
        assert_eq!(result.consumptions_removed, 2);
        assert!(matches!(get_food(&db, user_id, food.id), Err(TrackerError::NotFound(_))));
    }
}
