//! Aggregation core
//!
//! Daily bucketing, range windows, statistics and their presentation. Reads go
//! through `HistorySource`; goal writes go through `GoalTracker`.

pub mod daily;
pub mod goals;
pub mod history;
pub mod presenter;
pub mod range;
pub mod source;
pub mod stats;
pub mod synthetic;

pub use daily::{aggregate_day, bucket_by_day, day_of};
pub use goals::GoalTracker;
pub use history::{History, HistoryOrigin, RangeAggregator};
pub use presenter::{day_view, panels, present, range_label, DayView, MetricMode, StatsPanels, StatsView};
pub use range::{fill_days, parse_date, DateWindow, DayData, RangeSpec, MAX_RANGE_DAYS};
pub use source::HistorySource;
pub use stats::{calculate_stats, percent_of, StatsData};
pub use synthetic::SyntheticHistoryProvider;
