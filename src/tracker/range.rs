//! Range resolution and gap filling
//!
//! Turns a range variant into a contiguous, chronological window of calendar
//! days and lays out one `DayData` per day.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{GoalTargets, Nutrients};

/// Longest custom range accepted, in days
pub const MAX_RANGE_DAYS: i64 = 3660;

/// The supported time-window shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeSpec {
    /// Monday through Sunday of the week containing today
    CurrentWeek,
    /// The 7 days ending today
    TrailingWeek,
    /// The 30 days ending today
    TrailingMonth,
    /// Every day from `start` to `end`, inclusive
    Custom { start: NaiveDate, end: NaiveDate },
}

impl RangeSpec {
    /// Build a validated custom range
    pub fn custom(start: NaiveDate, end: NaiveDate) -> TrackerResult<Self> {
        validate_custom(start, end)?;
        Ok(RangeSpec::Custom { start, end })
    }

    /// Parse a range from loosely typed request parameters
    pub fn parse(kind: &str, start: Option<&str>, end: Option<&str>) -> TrackerResult<Self> {
        match kind.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "current_week" | "currentweek" => Ok(RangeSpec::CurrentWeek),
            "trailing_week" | "trailingweek" | "week" | "7" => Ok(RangeSpec::TrailingWeek),
            "trailing_month" | "trailingmonth" | "month" | "30" => Ok(RangeSpec::TrailingMonth),
            "custom" => {
                let (start, end) = match (start, end) {
                    (Some(s), Some(e)) => (parse_date(s)?, parse_date(e)?),
                    _ => {
                        return Err(TrackerError::validation(
                            "custom range requires both start and end dates",
                        ))
                    }
                };
                Self::custom(start, end)
            }
            other => Err(TrackerError::validation(format!(
                "unknown range '{}': expected current_week, trailing_week, trailing_month or custom",
                other
            ))),
        }
    }

    /// Resolve the window of days relative to `today`
    pub fn window(&self, today: NaiveDate) -> TrackerResult<DateWindow> {
        let window = match *self {
            RangeSpec::CurrentWeek => {
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                DateWindow { start: monday, end: monday + Duration::days(6) }
            }
            RangeSpec::TrailingWeek => DateWindow { start: today - Duration::days(6), end: today },
            RangeSpec::TrailingMonth => DateWindow { start: today - Duration::days(29), end: today },
            RangeSpec::Custom { start, end } => {
                validate_custom(start, end)?;
                DateWindow { start, end }
            }
        };
        Ok(window)
    }

    /// Whether statistics ignore days after today
    pub fn excludes_future_from_stats(&self) -> bool {
        matches!(self, RangeSpec::CurrentWeek)
    }
}

fn validate_custom(start: NaiveDate, end: NaiveDate) -> TrackerResult<()> {
    if start > end {
        return Err(TrackerError::validation(format!(
            "range start {} is after end {}",
            start, end
        )));
    }
    if (end - start).num_days() + 1 > MAX_RANGE_DAYS {
        return Err(TrackerError::validation(format!(
            "range {}..{} exceeds {} days",
            start, end, MAX_RANGE_DAYS
        )));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> TrackerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| TrackerError::validation(format!("invalid date '{}', expected YYYY-MM-DD", s)))
}

/// An inclusive span of calendar days, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn len(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Every day of the window, chronological
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len())
    }

    /// Half-open timestamp bounds: local midnight of `start` up to local
    /// midnight after `end`
    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        let lower = self.start.and_time(NaiveTime::MIN);
        let upper = self
            .end
            .succ_opt()
            .map(|d| d.and_time(NaiveTime::MIN))
            .unwrap_or(NaiveDateTime::MAX);
        (lower, upper)
    }
}

/// One day of history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayData {
    pub date: NaiveDate,
    pub calories_consumed: f64,
    pub protein_consumed: f64,
    pub calorie_goal: f64,
    pub protein_goal: f64,
}

impl DayData {
    pub fn new(date: NaiveDate, consumed: Nutrients, goal: GoalTargets) -> Self {
        Self {
            date,
            calories_consumed: consumed.calories,
            protein_consumed: consumed.protein,
            calorie_goal: goal.calorie_goal,
            protein_goal: goal.protein_goal,
        }
    }
}

/// One entry per day of the window; days without a bucket get zero totals.
/// The same goal applies to every day.
pub fn fill_days(
    window: &DateWindow,
    buckets: &BTreeMap<NaiveDate, Nutrients>,
    goal: GoalTargets,
) -> Vec<DayData> {
    window
        .days()
        .map(|date| {
            let consumed = buckets.get(&date).copied().unwrap_or_default();
            DayData::new(date, consumed, goal)
        })
        .collect()
}
