//! Synthetic history
//!
//! Random day data within fixed bounds, for when a caller explicitly chooses
//! placeholder data over a degraded real history. Output is always marked
//! `Synthetic`.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::TrackerResult;
use crate::models::{GoalTargets, Nutrients};

use super::history::{History, HistoryOrigin};
use super::range::{DayData, RangeSpec};

const CALORIE_BOUNDS: RangeInclusive<i64> = 200..=2000;
const PROTEIN_BOUNDS: RangeInclusive<i64> = 20..=120;

pub struct SyntheticHistoryProvider<R: Rng = StdRng> {
    rng: R,
}

impl SyntheticHistoryProvider<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible output for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SyntheticHistoryProvider<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SyntheticHistoryProvider<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Same day sequence as the real aggregator. Days after `today` stay empty.
    pub fn generate(
        &mut self,
        range: RangeSpec,
        today: NaiveDate,
        goal: GoalTargets,
    ) -> TrackerResult<History> {
        let window = range.window(today)?;

        let days: Vec<DayData> = window
            .days()
            .map(|date| {
                let consumed = if date > today {
                    Nutrients::zero()
                } else {
                    Nutrients::new(
                        self.rng.gen_range(CALORIE_BOUNDS) as f64,
                        self.rng.gen_range(PROTEIN_BOUNDS) as f64,
                    )
                };
                DayData::new(date, consumed, goal)
            })
            .collect();

        debug!(days = days.len(), start = %window.start, end = %window.end, "generated synthetic history");

        Ok(History {
            range,
            start: window.start,
            end: window.end,
            today,
            goal,
            goal_is_fallback: false,
            days,
            origin: HistoryOrigin::Synthetic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn test_values_stay_in_bounds() {
        let mut provider = SyntheticHistoryProvider::seeded(7);
        let history = provider
            .generate(RangeSpec::TrailingMonth, d(17), GoalTargets::new(2000.0, 120.0))
            .unwrap();

        assert_eq!(history.origin, HistoryOrigin::Synthetic);
        assert_eq!(history.days.len(), 30);
        for day in &history.days {
            assert!((200.0..=2000.0).contains(&day.calories_consumed));
            assert!((20.0..=120.0).contains(&day.protein_consumed));
            assert_eq!(day.calories_consumed.fract(), 0.0);
        }
    }

    #[test]
    fn test_future_days_are_empty() {
        let mut provider = SyntheticHistoryProvider::seeded(1);
        // Wednesday
        let history = provider
            .generate(RangeSpec::CurrentWeek, d(14), GoalTargets::new(2000.0, 120.0))
            .unwrap();

        assert_eq!(history.days.len(), 7);
        assert!(history.days[..3].iter().all(|day| day.calories_consumed > 0.0));
        assert!(history.days[3..].iter().all(|day| day.calories_consumed == 0.0));
        assert_eq!(history.stats().days_count, 3);
    }

    #[test]
    fn test_same_seed_same_history() {
        let goal = GoalTargets::new(1800.0, 100.0);
        let a = SyntheticHistoryProvider::seeded(42).generate(RangeSpec::TrailingWeek, d(17), goal).unwrap();
        let b = SyntheticHistoryProvider::seeded(42).generate(RangeSpec::TrailingWeek, d(17), goal).unwrap();
        assert_eq!(a.days, b.days);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let mut provider = SyntheticHistoryProvider::seeded(0);
        let result = provider.generate(
            RangeSpec::Custom { start: d(9), end: d(1) },
            d(17),
            GoalTargets::new(2000.0, 120.0),
        );
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }
}
