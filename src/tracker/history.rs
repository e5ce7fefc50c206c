//! Range aggregation
//!
//! Produces the contiguous day sequence for a range. Goal and consumptions
//! are re-read on every call; nothing is cached between requests.
//!
//! A failing source never fails the request. The fallback goal and zeroed
//! days are substituted and the result is marked `Degraded` so callers can
//! tell it apart from recorded data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TrackerResult;
use crate::models::GoalTargets;

use super::daily::bucket_by_day;
use super::range::{fill_days, DayData, RangeSpec};
use super::source::HistorySource;
use super::stats::{calculate_stats, StatsData};

/// How a day sequence was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrigin {
    /// Read from storage
    Recorded,
    /// Storage failed; defaults were substituted
    Degraded,
    /// Generated on explicit request
    Synthetic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    pub range: RangeSpec,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub today: NaiveDate,
    /// Goal applied to every day
    pub goal: GoalTargets,
    /// True when no goal was available and the fallback was used
    pub goal_is_fallback: bool,
    pub days: Vec<DayData>,
    pub origin: HistoryOrigin,
}

impl History {
    pub fn stats(&self) -> StatsData {
        calculate_stats(&self.days, &self.range, self.today)
    }
}

pub struct RangeAggregator<'a, S: HistorySource + ?Sized> {
    source: &'a S,
    fallback_goal: GoalTargets,
}

impl<'a, S: HistorySource + ?Sized> RangeAggregator<'a, S> {
    pub fn new(source: &'a S, fallback_goal: GoalTargets) -> Self {
        Self {
            source,
            fallback_goal,
        }
    }

    /// Build the day sequence for `range` as seen on `today`.
    ///
    /// Only an invalid range is an error.
    pub fn aggregate_range(
        &self,
        user_id: i64,
        range: RangeSpec,
        today: NaiveDate,
    ) -> TrackerResult<History> {
        let window = range.window(today)?;
        let mut origin = HistoryOrigin::Recorded;

        let (goal, goal_is_fallback) = match self.source.latest_goal(user_id) {
            Ok(Some(goal)) => (goal.targets(), false),
            Ok(None) => (self.fallback_goal, true),
            Err(e) => {
                warn!(user_id, error = %e, "goal lookup failed, using fallback goal");
                origin = HistoryOrigin::Degraded;
                (self.fallback_goal, true)
            }
        };

        let (start, end) = window.bounds();
        let buckets = match self.source.consumptions_between(user_id, start, end) {
            Ok(entries) => {
                debug!(user_id, entries = entries.len(), start = %window.start, end = %window.end, "aggregating range");
                bucket_by_day(&entries)
            }
            Err(e) => {
                warn!(user_id, error = %e, "consumption lookup failed, zero-filling range");
                origin = HistoryOrigin::Degraded;
                Default::default()
            }
        };

        Ok(History {
            range,
            start: window.start,
            end: window.end,
            today,
            goal,
            goal_is_fallback,
            days: fill_days(&window, &buckets, goal),
            origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, DbError, DbResult};
    use crate::error::TrackerError;
    use crate::models::{
        Consumption, ConsumptionCreate, ConsumptionDetail, DailyGoal, Food, FoodCreate, FoodUpdate,
        User,
    };
    use chrono::{NaiveDateTime, NaiveTime};

    const FALLBACK: GoalTargets = GoalTargets {
        calorie_goal: 2000.0,
        protein_goal: 120.0,
    };

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn at(day: u32, h: u32) -> NaiveDateTime {
        d(day).and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap())
    }

    struct Unavailable;

    impl HistorySource for Unavailable {
        fn latest_goal(&self, _user_id: i64) -> DbResult<Option<DailyGoal>> {
            Err(DbError::NotInitialized)
        }

        fn consumptions_between(
            &self,
            _user_id: i64,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> DbResult<Vec<ConsumptionDetail>> {
            Err(DbError::NotInitialized)
        }
    }

    fn seeded_db() -> (tempfile::TempDir, Database, i64, i64) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("history.db")).unwrap();
        let (user_id, food_id) = db
            .with_conn(|conn| {
                let user = User::get_or_create(conn, "alice")?;
                DailyGoal::create(conn, user.id, GoalTargets::new(2000.0, 150.0), at(1, 8))?;
                let food = Food::create(conn, user.id, &FoodCreate {
                    name: "Rice".to_string(),
                    calories_per_unit: 200.0,
                    protein_per_unit: 4.0,
                })?;
                Ok((user.id, food.id))
            })
            .unwrap();
        (dir, db, user_id, food_id)
    }

    fn log(db: &Database, user_id: i64, food_id: i64, quantity: f64, ts: NaiveDateTime) -> i64 {
        db.with_conn(|conn| {
            Consumption::create(conn, user_id, &ConsumptionCreate {
                food_id,
                quantity,
                consumed_at: ts,
            })
        })
        .unwrap()
        .id
    }

    #[test]
    fn test_unavailable_source_degrades() {
        let aggregator = RangeAggregator::new(&Unavailable, FALLBACK);
        let history = aggregator.aggregate_range(1, RangeSpec::TrailingMonth, d(17)).unwrap();

        assert_eq!(history.origin, HistoryOrigin::Degraded);
        assert!(history.goal_is_fallback);
        assert_eq!(history.days.len(), 30);
        assert!(history.days.iter().all(|day| day.calories_consumed == 0.0));
        assert!(history.days.iter().all(|day| day.calorie_goal == 2000.0 && day.protein_goal == 120.0));
    }

    #[test]
    fn test_invalid_range_is_not_absorbed() {
        let aggregator = RangeAggregator::new(&Unavailable, FALLBACK);
        let range = RangeSpec::Custom { start: d(10), end: d(2) };
        let result = aggregator.aggregate_range(1, range, d(17));
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_recorded_history_buckets_by_day() {
        let (_dir, db, user_id, food_id) = seeded_db();
        log(&db, user_id, food_id, 2.0, at(15, 8));
        log(&db, user_id, food_id, 1.0, at(15, 22));
        log(&db, user_id, food_id, 1.5, at(16, 12));

        let aggregator = RangeAggregator::new(&db, FALLBACK);
        let history = aggregator.aggregate_range(user_id, RangeSpec::TrailingWeek, d(17)).unwrap();

        assert_eq!(history.origin, HistoryOrigin::Recorded);
        assert!(!history.goal_is_fallback);
        assert_eq!(history.goal, GoalTargets::new(2000.0, 150.0));
        assert_eq!(history.days.len(), 7);
        assert_eq!(history.days[0].date, d(11));

        let by_date = |day: u32| history.days.iter().find(|x| x.date == d(day)).unwrap();
        assert_eq!(by_date(15).calories_consumed, 600.0);
        assert_eq!(by_date(16).calories_consumed, 300.0);
        assert_eq!(by_date(17).calories_consumed, 0.0);

        let stats = history.stats();
        let sum: f64 = history.days.iter().map(|day| day.calories_consumed).sum();
        assert_eq!(stats.total_calories, sum);
    }

    #[test]
    fn test_food_edit_changes_past_days() {
        let (_dir, db, user_id, food_id) = seeded_db();
        log(&db, user_id, food_id, 2.0, at(12, 9));

        let aggregator = RangeAggregator::new(&db, FALLBACK);
        let before = aggregator.aggregate_range(user_id, RangeSpec::CurrentWeek, d(14)).unwrap();
        assert_eq!(before.days[0].calories_consumed, 400.0);

        db.with_conn(|conn| {
            Food::update(conn, user_id, food_id, &FoodUpdate {
                calories_per_unit: Some(250.0),
                ..Default::default()
            })
        })
        .unwrap();

        let after = aggregator.aggregate_range(user_id, RangeSpec::CurrentWeek, d(14)).unwrap();
        assert_eq!(after.days[0].calories_consumed, 500.0);
    }

    #[test]
    fn test_deleting_consumption_only_touches_its_day() {
        let (_dir, db, user_id, food_id) = seeded_db();
        log(&db, user_id, food_id, 1.0, at(13, 9));
        let doomed = log(&db, user_id, food_id, 3.0, at(14, 9));
        log(&db, user_id, food_id, 1.0, at(14, 19));

        let aggregator = RangeAggregator::new(&db, FALLBACK);
        let before = aggregator.aggregate_range(user_id, RangeSpec::TrailingWeek, d(14)).unwrap();

        db.with_conn(|conn| Consumption::delete(conn, user_id, doomed)).unwrap();
        let after = aggregator.aggregate_range(user_id, RangeSpec::TrailingWeek, d(14)).unwrap();

        for (old, new) in before.days.iter().zip(after.days.iter()) {
            if old.date == d(14) {
                assert_eq!(old.calories_consumed - new.calories_consumed, 600.0);
            } else {
                assert_eq!(old.calories_consumed, new.calories_consumed);
            }
        }
    }

    #[test]
    fn test_missing_goal_uses_fallback_without_degrading() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("empty.db")).unwrap();
        let user_id = db.with_conn(|conn| User::get_or_create(conn, "bob")).unwrap().id;

        let history = RangeAggregator::new(&db, FALLBACK)
            .aggregate_range(user_id, RangeSpec::CurrentWeek, d(17))
            .unwrap();
        assert_eq!(history.origin, HistoryOrigin::Recorded);
        assert!(history.goal_is_fallback);
        assert_eq!(history.goal, FALLBACK);
    }
}
