//! Range statistics
//!
//! Totals, daily averages and percent-of-goal over a day sequence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::range::{DayData, RangeSpec};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsData {
    /// Average calories per counted day
    pub calories: f64,
    /// Average protein per counted day
    pub protein: f64,
    pub calorie_percent: f64,
    pub protein_percent: f64,
    pub total_calories: f64,
    pub total_protein: f64,
    pub avg_calorie_goal: f64,
    pub avg_protein_goal: f64,
    pub total_calorie_goal: f64,
    pub total_protein_goal: f64,
    pub days_count: usize,
}

/// `value / goal * 100`, or 0 when the goal is zero or the result is not finite
pub fn percent_of(value: f64, goal: f64) -> f64 {
    if goal == 0.0 {
        return 0.0;
    }
    let percent = value / goal * 100.0;
    if percent.is_finite() {
        percent
    } else {
        0.0
    }
}

/// Compute statistics for a day sequence.
///
/// For the current week only days up to and including `today` are counted;
/// later days stay in the sequence but contribute nothing.
pub fn calculate_stats(days: &[DayData], range: &RangeSpec, today: NaiveDate) -> StatsData {
    let counted: Vec<&DayData> = if range.excludes_future_from_stats() {
        days.iter().filter(|day| day.date <= today).collect()
    } else {
        days.iter().collect()
    };

    if counted.is_empty() {
        return StatsData::default();
    }

    let total_calories: f64 = counted.iter().map(|d| d.calories_consumed).sum();
    let total_protein: f64 = counted.iter().map(|d| d.protein_consumed).sum();
    let total_calorie_goal: f64 = counted.iter().map(|d| d.calorie_goal).sum();
    let total_protein_goal: f64 = counted.iter().map(|d| d.protein_goal).sum();

    let days_count = counted.len();
    let n = days_count as f64;

    StatsData {
        calories: total_calories / n,
        protein: total_protein / n,
        calorie_percent: percent_of(total_calories, total_calorie_goal),
        protein_percent: percent_of(total_protein, total_protein_goal),
        total_calories,
        total_protein,
        avg_calorie_goal: total_calorie_goal / n,
        avg_protein_goal: total_protein_goal / n,
        total_calorie_goal,
        total_protein_goal,
        days_count,
    }
}
