//! Read-side storage seam for the range aggregator

use chrono::NaiveDateTime;

use crate::db::{Database, DbResult};
use crate::models::{Consumption, ConsumptionDetail, DailyGoal};

/// Where history reads come from
pub trait HistorySource {
    /// The user's current goal, if one was ever set
    fn latest_goal(&self, user_id: i64) -> DbResult<Option<DailyGoal>>;

    /// Consumptions with `start <= consumed_at < end`, joined with current
    /// food values
    fn consumptions_between(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> DbResult<Vec<ConsumptionDetail>>;
}

impl HistorySource for Database {
    fn latest_goal(&self, user_id: i64) -> DbResult<Option<DailyGoal>> {
        self.with_conn(|conn| DailyGoal::latest(conn, user_id))
    }

    fn consumptions_between(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> DbResult<Vec<ConsumptionDetail>> {
        self.with_conn(|conn| Consumption::list_between(conn, user_id, start, end))
    }
}
