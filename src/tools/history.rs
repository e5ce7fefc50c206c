//! History tools
//!
//! Read-only views over the day sequence: range history with both stats
//! panels, presented stats, synthetic placeholder history, today and single
//! day summaries. Every call re-reads storage.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::error::TrackerResult;
use crate::models::{local_now, GoalTargets, Nutrients};
use crate::tracker::{
    aggregate_day, calculate_stats, day_view, panels, percent_of, range_label, DateWindow, DayView,
    History, HistoryOrigin, HistorySource, RangeAggregator, RangeSpec, StatsData, StatsPanels,
    SyntheticHistoryProvider,
};

use super::consumptions::ConsumptionEntry;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub label: String,
    pub range: RangeSpec,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub today: NaiveDate,
    pub origin: HistoryOrigin,
    pub calorie_goal: f64,
    pub protein_goal: f64,
    pub goal_is_fallback: bool,
    pub days: Vec<DayView>,
    pub stats: StatsData,
    /// Collapsed and expanded views with totals selected
    pub totals: StatsPanels,
    /// Collapsed and expanded views with daily averages selected
    pub averages: StatsPanels,
    pub revision: u64,
}

impl HistoryResponse {
    fn from_history(history: History, revision: u64) -> Self {
        let stats = history.stats();
        let window = DateWindow {
            start: history.start,
            end: history.end,
        };
        Self {
            label: range_label(&history.range, &window),
            range: history.range,
            start: history.start,
            end: history.end,
            today: history.today,
            origin: history.origin,
            calorie_goal: history.goal.calorie_goal,
            protein_goal: history.goal.protein_goal,
            goal_is_fallback: history.goal_is_fallback,
            days: history.days.iter().map(|day| day_view(day, history.today)).collect(),
            totals: panels(&stats, true),
            averages: panels(&stats, false),
            stats,
            revision,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub label: String,
    pub origin: HistoryOrigin,
    pub stats: StatsData,
    pub view: StatsPanels,
    pub revision: u64,
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    /// Newest first
    pub entries: Vec<ConsumptionEntry>,
    pub calories_consumed: f64,
    pub protein_consumed: f64,
    pub calorie_goal: f64,
    pub protein_goal: f64,
    pub goal_is_fallback: bool,
    /// Goal minus consumed; negative once the goal is exceeded
    pub calories_remaining: f64,
    pub protein_remaining: f64,
    pub revision: u64,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: NaiveDate,
    pub entries: Vec<ConsumptionEntry>,
    pub calories_consumed: f64,
    pub protein_consumed: f64,
    pub calorie_goal: f64,
    pub protein_goal: f64,
    pub goal_is_fallback: bool,
    pub calorie_percent: f64,
    pub protein_percent: f64,
    pub revision: u64,
}

fn today() -> NaiveDate {
    local_now().date()
}

pub fn get_history(
    db: &Database,
    user_id: i64,
    range: RangeSpec,
    fallback: GoalTargets,
    revision: u64,
) -> TrackerResult<HistoryResponse> {
    let history = RangeAggregator::new(db, fallback).aggregate_range(user_id, range, today())?;
    info!(user_id, range = ?range, days = history.days.len(), origin = ?history.origin, "history served");
    Ok(HistoryResponse::from_history(history, revision))
}

pub fn get_stats(
    db: &Database,
    user_id: i64,
    range: RangeSpec,
    show_totals: bool,
    fallback: GoalTargets,
    revision: u64,
) -> TrackerResult<StatsResponse> {
    let history = RangeAggregator::new(db, fallback).aggregate_range(user_id, range, today())?;
    let stats = calculate_stats(&history.days, &history.range, history.today);
    let window = DateWindow {
        start: history.start,
        end: history.end,
    };
    Ok(StatsResponse {
        label: range_label(&range, &window),
        origin: history.origin,
        view: panels(&stats, show_totals),
        stats,
        revision,
    })
}

/// Random placeholder history, explicitly requested by the caller
pub fn get_synthetic_history(
    db: &Database,
    user_id: i64,
    range: RangeSpec,
    fallback: GoalTargets,
    seed: Option<u64>,
    revision: u64,
) -> TrackerResult<HistoryResponse> {
    let goal = match db.latest_goal(user_id) {
        Ok(Some(goal)) => goal.targets(),
        Ok(None) => fallback,
        Err(e) => {
            warn!(user_id, error = %e, "goal lookup failed, using fallback goal");
            fallback
        }
    };

    let history = match seed {
        Some(seed) => SyntheticHistoryProvider::seeded(seed).generate(range, today(), goal)?,
        None => SyntheticHistoryProvider::new().generate(range, today(), goal)?,
    };
    Ok(HistoryResponse::from_history(history, revision))
}

/// Entries and goal for one calendar day
fn load_day(
    db: &Database,
    user_id: i64,
    date: NaiveDate,
    fallback: GoalTargets,
) -> TrackerResult<(Vec<ConsumptionEntry>, Nutrients, GoalTargets, bool)> {
    let window = DateWindow { start: date, end: date };
    let (lower, upper) = window.bounds();

    let details = db.consumptions_between(user_id, lower, upper)?;
    let (goal, is_fallback) = match db.latest_goal(user_id)? {
        Some(goal) => (goal.targets(), false),
        None => (fallback, true),
    };

    let consumed = aggregate_day(&details);
    let entries = details.iter().map(ConsumptionEntry::from).collect();
    Ok((entries, consumed, goal, is_fallback))
}

pub fn get_today(db: &Database, user_id: i64, fallback: GoalTargets, revision: u64) -> TrackerResult<TodayResponse> {
    let date = today();
    let (mut entries, consumed, goal, goal_is_fallback) = load_day(db, user_id, date, fallback)?;
    entries.reverse();

    Ok(TodayResponse {
        date,
        entries,
        calories_consumed: consumed.calories,
        protein_consumed: consumed.protein,
        calorie_goal: goal.calorie_goal,
        protein_goal: goal.protein_goal,
        goal_is_fallback,
        calories_remaining: goal.calorie_goal - consumed.calories,
        protein_remaining: goal.protein_goal - consumed.protein,
        revision,
    })
}

pub fn get_day(
    db: &Database,
    user_id: i64,
    date: NaiveDate,
    fallback: GoalTargets,
    revision: u64,
) -> TrackerResult<DayResponse> {
    let (entries, consumed, goal, goal_is_fallback) = load_day(db, user_id, date, fallback)?;

    Ok(DayResponse {
        date,
        entries,
        calories_consumed: consumed.calories,
        protein_consumed: consumed.protein,
        calorie_goal: goal.calorie_goal,
        protein_goal: goal.protein_goal,
        goal_is_fallback,
        calorie_percent: percent_of(consumed.calories, goal.calorie_goal),
        protein_percent: percent_of(consumed.protein, goal.protein_goal),
        revision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::models::{Food, FoodCreate, User};
    use crate::tools::consumptions::log_consumption;
    use crate::tools::goals::set_goal;
    use crate::tracker::MetricMode;

    const FALLBACK: GoalTargets = GoalTargets {
        calorie_goal: 2000.0,
        protein_goal: 120.0,
    };

    fn setup() -> (tempfile::TempDir, Database, i64, i64) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("history.db")).unwrap();
        let (user_id, food_id) = db
            .with_conn(|conn| {
                let user = User::get_or_create(conn, "alice")?;
                let food = Food::create(conn, user.id, &FoodCreate {
                    name: "Chicken".to_string(),
                    calories_per_unit: 165.0,
                    protein_per_unit: 31.0,
                })?;
                Ok((user.id, food.id))
            })
            .unwrap();
        (dir, db, user_id, food_id)
    }

    #[test]
    fn test_today_reports_remaining() {
        let (_dir, db, user_id, food_id) = setup();
        set_goal(&db, user_id, 2000.0, 150.0).unwrap();
        log_consumption(&db, user_id, food_id, 2.0, None).unwrap();

        let summary = get_today(&db, user_id, FALLBACK, 3).unwrap();
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.calories_consumed, 330.0);
        assert_eq!(summary.calories_remaining, 1670.0);
        assert_eq!(summary.protein_remaining, 88.0);
        assert!(!summary.goal_is_fallback);
        assert_eq!(summary.revision, 3);
    }

    #[test]
    fn test_day_percent_uses_fallback_goal() {
        let (_dir, db, user_id, food_id) = setup();
        log_consumption(&db, user_id, food_id, 4.0, Some("2026-10-03 13:00")).unwrap();

        let day = get_day(&db, user_id, NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(), FALLBACK, 0).unwrap();
        assert!(day.goal_is_fallback);
        assert_eq!(day.calories_consumed, 660.0);
        assert_eq!(day.calorie_percent, 33.0);
    }

    #[test]
    fn test_history_carries_both_panels() {
        let (_dir, db, user_id, food_id) = setup();
        log_consumption(&db, user_id, food_id, 1.0, None).unwrap();

        let history = get_history(&db, user_id, RangeSpec::TrailingWeek, FALLBACK, 1).unwrap();
        assert_eq!(history.label, "Last 7 days");
        assert_eq!(history.origin, HistoryOrigin::Recorded);
        assert_eq!(history.days.len(), 7);
        assert!(history.days.last().unwrap().is_today);
        assert_eq!(history.totals.view.mode, MetricMode::Totals);
        assert_eq!(history.averages.view.mode, MetricMode::DailyAverages);
        assert_eq!(history.totals.view.calorie_percent, history.averages.view.calorie_percent);
        assert_eq!(history.stats.total_calories, 165.0);
    }

    #[test]
    fn test_stats_rejects_inverted_custom_range() {
        let (_dir, db, user_id, _food_id) = setup();
        let range = RangeSpec::Custom {
            start: NaiveDate::from_ymd_opt(2026, 10, 9).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        };
        let result = get_stats(&db, user_id, range, true, FALLBACK, 0);
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_synthetic_history_is_marked() {
        let (_dir, db, user_id, _food_id) = setup();
        let history = get_synthetic_history(&db, user_id, RangeSpec::TrailingMonth, FALLBACK, Some(9), 0).unwrap();
        assert_eq!(history.origin, HistoryOrigin::Synthetic);
        assert_eq!(history.days.len(), 30);
        assert_eq!(history.label, "Last 30 days");
    }
}
