//! Daily aggregation
//!
//! Reduces consumptions to per-day totals. A day is a local calendar date,
//! not a rolling 24-hour window.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{ConsumptionDetail, Nutrients};

/// Calendar-day bucket key of a local timestamp
pub fn day_of(ts: NaiveDateTime) -> NaiveDate {
    ts.date()
}

/// Sum the contributions of the given consumptions. Empty input is zero.
pub fn aggregate_day<'a, I>(entries: I) -> Nutrients
where
    I: IntoIterator<Item = &'a ConsumptionDetail>,
{
    entries.into_iter().map(ConsumptionDetail::contribution).sum()
}

/// Group consumptions by calendar day and total each bucket
pub fn bucket_by_day(entries: &[ConsumptionDetail]) -> BTreeMap<NaiveDate, Nutrients> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&ConsumptionDetail>> = BTreeMap::new();
    for entry in entries {
        grouped.entry(day_of(entry.consumed_at)).or_default().push(entry);
    }

    grouped
        .into_iter()
        .map(|(date, day_entries)| (date, aggregate_day(day_entries)))
        .collect()
}
