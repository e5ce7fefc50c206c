//! Consumption tools
//!
//! Log what was eaten, list it for a date range, delete entries.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::error::{ensure_positive, TrackerError, TrackerResult};
use crate::models::{local_now, Consumption, ConsumptionCreate, ConsumptionDetail, Food};
use crate::tracker::{parse_date, RangeSpec};

/// A consumption with its current nutrient contribution
#[derive(Debug, Serialize)]
pub struct ConsumptionEntry {
    pub id: i64,
    pub food_id: i64,
    pub food_name: String,
    pub quantity: f64,
    pub consumed_at: String,
    pub calories: f64,
    pub protein: f64,
}

impl From<&ConsumptionDetail> for ConsumptionEntry {
    fn from(detail: &ConsumptionDetail) -> Self {
        let contribution = detail.contribution();
        Self {
            id: detail.id,
            food_id: detail.food_id,
            food_name: detail.food.name.clone(),
            quantity: detail.quantity,
            consumed_at: detail.consumed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            calories: contribution.calories,
            protein: contribution.protein,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListConsumptionsResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub entries: Vec<ConsumptionEntry>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteConsumptionResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Parse `YYYY-MM-DD HH:MM[:SS]` (a `T` separator also works), or a bare
/// `YYYY-MM-DD` meaning local noon.
pub fn parse_consumed_at(s: &str) -> TrackerResult<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)));
    }
    Err(TrackerError::validation(format!(
        "invalid consumed_at '{}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]",
        s
    )))
}

/// Log a quantity of a food. `consumed_at` defaults to now.
pub fn log_consumption(
    db: &Database,
    user_id: i64,
    food_id: i64,
    quantity: f64,
    consumed_at: Option<&str>,
) -> TrackerResult<ConsumptionEntry> {
    ensure_positive("quantity", quantity)?;
    let consumed_at = match consumed_at {
        Some(s) => parse_consumed_at(s)?,
        None => local_now(),
    };

    let detail = db.with_transaction(|tx| -> TrackerResult<ConsumptionDetail> {
        if Food::get(tx, user_id, food_id)?.is_none() {
            return Err(TrackerError::not_found(format!("food {}", food_id)));
        }
        let created = Consumption::create(tx, user_id, &ConsumptionCreate {
            food_id,
            quantity,
            consumed_at,
        })?;
        Consumption::get_detail(tx, user_id, created.id)?
            .ok_or_else(|| TrackerError::not_found(format!("consumption {}", created.id)))
    })?;

    info!(user_id, consumption_id = detail.id, food_id, quantity, "consumption logged");
    Ok(ConsumptionEntry::from(&detail))
}

/// Consumptions whose date falls in the range, oldest first
pub fn list_consumptions(
    db: &Database,
    user_id: i64,
    start: &str,
    end: &str,
) -> TrackerResult<ListConsumptionsResponse> {
    let window = RangeSpec::custom(parse_date(start)?, parse_date(end)?)?.window(local_now().date())?;
    let (lower, upper) = window.bounds();

    let details = db.with_conn(|conn| Consumption::list_between(conn, user_id, lower, upper))?;
    let entries: Vec<ConsumptionEntry> = details.iter().map(ConsumptionEntry::from).collect();
    let total = entries.len();

    Ok(ListConsumptionsResponse {
        start: window.start,
        end: window.end,
        entries,
        total,
    })
}

pub fn delete_consumption(db: &Database, user_id: i64, id: i64) -> TrackerResult<DeleteConsumptionResponse> {
    let deleted = db.with_conn(|conn| Consumption::delete(conn, user_id, id))?;
    if !deleted {
        return Err(TrackerError::not_found(format!("consumption {}", id)));
    }

    info!(user_id, consumption_id = id, "consumption deleted");
    Ok(DeleteConsumptionResponse {
        success: true,
        deleted_id: id,
    })
}
