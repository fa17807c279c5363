//! Per-day click count used by analytics series.

use chrono::NaiveDate;
use serde::Serialize;

/// Number of clicks recorded on one UTC calendar day.
///
/// Serializes as `{"date": "YYYY-MM-DD", "count": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: i64,
}

impl DayCount {
    pub fn new(date: NaiveDate, count: i64) -> Self {
        Self { date, count }
    }

    pub fn zero(date: NaiveDate) -> Self {
        Self { date, count: 0 }
    }
}

/// One row of a grouped multi-link aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkDayCount {
    pub link_id: i64,
    pub date: NaiveDate,
    pub count: i64,
}
