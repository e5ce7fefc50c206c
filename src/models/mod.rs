//! Data models
//!
//! Rust structs representing database entities.

mod consumption;
mod daily_goal;
mod food;
mod nutrition;
mod user;

pub use consumption::{Consumption, ConsumptionCreate, ConsumptionDetail, FoodRef};
pub use daily_goal::{DailyGoal, GoalTargets};
pub use food::{Food, FoodCreate, FoodUpdate};
pub use nutrition::{nutrient_contribution, Nutrients};
pub use user::User;

use chrono::{Local, NaiveDateTime};

/// Current local wall-clock time, the reference for day buckets
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
pub(crate) fn test_conn() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    crate::db::migrations::run_migrations(&conn).unwrap();
    conn
}
