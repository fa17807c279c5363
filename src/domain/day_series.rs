//! Zero-filled day series built from sparse per-day aggregates.
//!
//! Stores only return days that have clicks. Dashboards need one entry per
//! calendar day, so the sparse rows are walked against the requested window
//! and missing days are emitted with a count of zero.

use chrono::{Days, NaiveDate};
use std::collections::HashMap;

use crate::domain::entities::DayCount;

/// First day of a window of `days` calendar days ending at `today` (inclusive).
///
/// Returns `None` for an empty window.
pub fn window_start(today: NaiveDate, days: u32) -> Option<NaiveDate> {
    if days == 0 {
        return None;
    }
    today.checked_sub_days(Days::new(u64::from(days) - 1))
}

/// Expands sparse counts into exactly `days` entries, oldest first, ending at `today`.
///
/// Counts for dates outside the window are ignored.
pub fn fill_days(sparse: &HashMap<NaiveDate, i64>, days: u32, today: NaiveDate) -> Vec<DayCount> {
    let Some(start) = window_start(today, days) else {
        return Vec::new();
    };

    start
        .iter_days()
        .take(days as usize)
        .map(|date| DayCount::new(date, sparse.get(&date).copied().unwrap_or(0)))
        .collect()
}

/// Convenience wrapper over [`fill_days`] for store rows.
pub fn fill_from_rows(rows: &[DayCount], days: u32, today: NaiveDate) -> Vec<DayCount> {
    let sparse: HashMap<NaiveDate, i64> = rows.iter().map(|r| (r.date, r.count)).collect();
    fill_days(&sparse, days, today)
}
