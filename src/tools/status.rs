//! Nutrack status tool
//!
//! Runtime status of the service, plus usage notes for assistants driving it.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// How to drive the tracking tools
pub const TRACKING_INSTRUCTIONS: &str = r#"
# Nutrack Tracking Instructions

## Foods
Foods store calories and protein **per unit**. A unit is whatever the user
counts in: one egg, one slice, one 100 g portion. Create them with `add_food`
and reuse them; `list_foods` first to avoid duplicates.

Editing a food with `update_food` changes every past day that used it. If a
recipe really changed, add a new food instead.

## Logging
`log_consumption` takes a `food_id` and a `quantity` of units (must be > 0).
`consumed_at` is optional:
- omitted: now
- `YYYY-MM-DD HH:MM` or `YYYY-MM-DD HH:MM:SS`: that local time
- `YYYY-MM-DD`: noon on that day

Mistakes are fixed with `delete_consumption` and a new log.

## Goals
`set_goal` records a daily calorie and protein target. `adjust_goal` adds
earned calories (e.g. from exercise) to the current calorie target and keeps
protein unchanged. Both append to `list_goal_history`; the newest goal applies
to every day of any history view.

## Viewing progress
- `get_today`: today's entries and what remains
- `get_day`: one date in detail
- `get_history`: day-by-day data for `current_week`, `trailing_week`,
  `trailing_month` or `custom` (with `start` and `end`)
- `get_stats`: the summary for a range, totals or daily averages

In `current_week`, days after today are listed but not counted in stats.
Percentages always come from totals.

`origin` tells where history came from: `recorded`, `degraded` (storage
failed, zeros shown) or `synthetic` (placeholder data from
`get_synthetic_history`). Never present synthetic data as real.

`revision` increases on every change; an unchanged revision means nothing
new was logged.
"#;

/// Runtime status of the Nutrack service
#[derive(Debug, Clone, Serialize)]
pub struct NutrackStatus {
    #[serde(flatten)]
    pub build: BuildInfo,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Session
    pub user: String,
    pub data_revision: u64,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self, user: &str, data_revision: u64) -> NutrackStatus {
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrackStatus {
            build: BuildInfo::current(),
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            user: user.to_string(),
            data_revision,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
