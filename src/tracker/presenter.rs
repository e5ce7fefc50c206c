//! Display-ready values
//!
//! Everything shown for a range is derived from one `StatsData`. The
//! collapsed summary and the expanded cards both read a `StatsView`, so the
//! totals/averages toggle cannot drift between them.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::range::{DateWindow, DayData, RangeSpec};
use super::stats::{percent_of, StatsData};

/// Which figures the toggle selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricMode {
    Totals,
    DailyAverages,
}

/// Rounded stats for one toggle position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub mode: MetricMode,
    pub calories: f64,
    pub protein: f64,
    pub calorie_goal: f64,
    pub protein_goal: f64,
    /// Always from totals, never averaged
    pub calorie_percent: f64,
    pub protein_percent: f64,
    /// Progress-ring fill, clamped to `0.0..=1.0`
    pub calorie_progress: f64,
    pub protein_progress: f64,
    pub days_count: usize,
}

impl StatsView {
    /// Collapsed summary line, e.g. `"1500 / 2000 kcal per day"`
    pub fn summary_line(&self) -> String {
        let suffix = match self.mode {
            MetricMode::Totals => "",
            MetricMode::DailyAverages => " per day",
        };
        format!(
            "{} / {} kcal{}, {}g / {}g protein{}",
            self.calories, self.calorie_goal, suffix, self.protein, self.protein_goal, suffix
        )
    }

    /// Expanded card captions for calories and protein
    pub fn card_captions(&self, stats_totals: &TotalsCaption) -> (String, String) {
        match self.mode {
            MetricMode::Totals => (
                format!("Target: {} for {} days", self.calorie_goal, self.days_count),
                format!("Target: {}g for {} days", self.protein_goal, self.days_count),
            ),
            MetricMode::DailyAverages => (
                format!("Total: {} cal", stats_totals.calories),
                format!("Total: {}g", stats_totals.protein),
            ),
        }
    }
}

/// Rounded range totals, shown under averages in the expanded cards
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TotalsCaption {
    pub calories: f64,
    pub protein: f64,
}

impl From<&StatsData> for TotalsCaption {
    fn from(stats: &StatsData) -> Self {
        Self {
            calories: round_half_up(stats.total_calories),
            protein: round_half_up(stats.total_protein),
        }
    }
}

/// Round to the nearest integer, halves away from zero. Displayed values
/// are never negative, so halves go up.
pub fn round_half_up(value: f64) -> f64 {
    value.round()
}

/// Select totals or averages; percentages always come from totals
pub fn present(stats: &StatsData, show_totals: bool) -> StatsView {
    let (mode, calories, protein, calorie_goal, protein_goal) = if show_totals {
        (
            MetricMode::Totals,
            stats.total_calories,
            stats.total_protein,
            stats.total_calorie_goal,
            stats.total_protein_goal,
        )
    } else {
        (
            MetricMode::DailyAverages,
            stats.calories,
            stats.protein,
            stats.avg_calorie_goal,
            stats.avg_protein_goal,
        )
    };

    StatsView {
        mode,
        calories: round_half_up(calories),
        protein: round_half_up(protein),
        calorie_goal: round_half_up(calorie_goal),
        protein_goal: round_half_up(protein_goal),
        calorie_percent: round_half_up(stats.calorie_percent),
        protein_percent: round_half_up(stats.protein_percent),
        calorie_progress: (stats.calorie_percent / 100.0).clamp(0.0, 1.0),
        protein_progress: (stats.protein_percent / 100.0).clamp(0.0, 1.0),
        days_count: stats.days_count,
    }
}

/// Collapsed summary and expanded cards, built from the same view
#[derive(Debug, Clone, Serialize)]
pub struct StatsPanels {
    pub view: StatsView,
    pub summary: String,
    pub calorie_caption: String,
    pub protein_caption: String,
}

pub fn panels(stats: &StatsData, show_totals: bool) -> StatsPanels {
    let view = present(stats, show_totals);
    let summary = view.summary_line();
    let (calorie_caption, protein_caption) = view.card_captions(&TotalsCaption::from(stats));
    StatsPanels {
        view,
        summary,
        calorie_caption,
        protein_caption,
    }
}

/// One day circle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub calories_consumed: f64,
    pub protein_consumed: f64,
    pub calorie_goal: f64,
    pub protein_goal: f64,
    pub calorie_percent: f64,
    pub protein_percent: f64,
    pub is_today: bool,
    /// Shown dimmed; not counted in current-week stats
    pub is_future: bool,
}

pub fn day_view(day: &DayData, today: NaiveDate) -> DayView {
    DayView {
        date: day.date,
        weekday: weekday_abbrev(day.date.weekday()),
        calories_consumed: round_half_up(day.calories_consumed),
        protein_consumed: round_half_up(day.protein_consumed),
        calorie_goal: day.calorie_goal,
        protein_goal: day.protein_goal,
        calorie_percent: round_half_up(percent_of(day.calories_consumed, day.calorie_goal)),
        protein_percent: round_half_up(percent_of(day.protein_consumed, day.protein_goal)),
        is_today: day.date == today,
        is_future: day.date > today,
    }
}

fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Human label for a range
pub fn range_label(range: &RangeSpec, window: &DateWindow) -> String {
    match range {
        RangeSpec::CurrentWeek => format!(
            "{} - {}",
            window.start.format("%b %-d"),
            window.end.format("%b %-d")
        ),
        RangeSpec::TrailingWeek => "Last 7 days".to_string(),
        RangeSpec::TrailingMonth => "Last 30 days".to_string(),
        RangeSpec::Custom { .. } => format!(
            "{} - {} ({} days)",
            window.start.format("%b %-d"),
            window.end.format("%b %-d"),
            window.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn sample_stats() -> StatsData {
        StatsData {
            calories: 1500.4,
            protein: 90.5,
            calorie_percent: 75.02,
            protein_percent: 112.6,
            total_calories: 4501.2,
            total_protein: 271.5,
            avg_calorie_goal: 2000.0,
            avg_protein_goal: 120.0,
            total_calorie_goal: 6000.0,
            total_protein_goal: 360.0,
            days_count: 3,
        }
    }

    #[test]
    fn test_toggle_selects_totals_or_averages() {
        let stats = sample_stats();

        let totals = present(&stats, true);
        assert_eq!(totals.mode, MetricMode::Totals);
        assert_eq!((totals.calories, totals.calorie_goal), (4501.0, 6000.0));
        assert_eq!((totals.protein, totals.protein_goal), (272.0, 360.0));

        let averages = present(&stats, false);
        assert_eq!(averages.mode, MetricMode::DailyAverages);
        assert_eq!((averages.calories, averages.calorie_goal), (1500.0, 2000.0));
        assert_eq!(averages.protein, 91.0);
    }

    #[test]
    fn test_percentages_do_not_depend_on_toggle() {
        let stats = sample_stats();
        let totals = present(&stats, true);
        let averages = present(&stats, false);

        assert_eq!(totals.calorie_percent, 75.0);
        assert_eq!(totals.calorie_percent, averages.calorie_percent);
        assert_eq!(totals.protein_percent, averages.protein_percent);
        assert_eq!(totals.protein_progress, 1.0);
    }

    #[test]
    fn test_panels_share_one_view() {
        let stats = sample_stats();

        let shown = panels(&stats, true);
        assert_eq!(shown.view, present(&stats, true));
        assert_eq!(shown.summary, "4501 / 6000 kcal, 272g / 360g protein");
        assert_eq!(shown.calorie_caption, "Target: 6000 for 3 days");

        let averaged = panels(&stats, false);
        assert_eq!(averaged.summary, "1500 / 2000 kcal per day, 91g / 120g protein per day");
        assert_eq!(averaged.calorie_caption, "Total: 4501 cal");
        assert_eq!(averaged.protein_caption, "Total: 272g");
    }

    #[test]
    fn test_day_view_flags() {
        let day = DayData {
            date: d(15),
            calories_consumed: 999.5,
            protein_consumed: 60.0,
            calorie_goal: 2000.0,
            protein_goal: 0.0,
        };
        let view = day_view(&day, d(14));
        assert!(view.is_future);
        assert!(!view.is_today);
        assert_eq!(view.weekday, "Thu");
        assert_eq!(view.calories_consumed, 1000.0);
        assert_eq!(view.calorie_percent, 50.0);
        assert_eq!(view.protein_percent, 0.0);
    }

    #[test]
    fn test_rounding_just_below_half() {
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(1499.5), 1500.0);
        assert_eq!(round_half_up(0.0), 0.0);
    }

    #[test]
    fn test_range_labels() {
        let week = DateWindow { start: d(12), end: d(18) };
        assert_eq!(range_label(&RangeSpec::CurrentWeek, &week), "Oct 12 - Oct 18");
        assert_eq!(range_label(&RangeSpec::TrailingWeek, &week), "Last 7 days");
        assert_eq!(range_label(&RangeSpec::TrailingMonth, &week), "Last 30 days");

        let custom = RangeSpec::Custom { start: d(1), end: d(9) };
        let window = DateWindow { start: d(1), end: d(9) };
        assert_eq!(range_label(&custom, &window), "Oct 1 - Oct 9 (9 days)");
    }
}
