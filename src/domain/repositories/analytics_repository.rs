//! Repository trait for day-bucketed click aggregation.

use crate::domain::entities::{DayCount, LinkDayCount};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository interface for the analytics aggregator.
///
/// Results are sparse: only days with at least one click are returned. Gap
/// filling happens in [`crate::domain::day_series`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Click counts per day for one link, ascending by date.
    ///
    /// When `since` is `Some`, only days on or after it are counted.
    async fn clicks_by_day(
        &self,
        link_id: i64,
        since: Option<NaiveDate>,
    ) -> Result<Vec<DayCount>, StoreError>;

    /// Click counts per link and day for all `link_ids` in a single grouped query.
    async fn batch_clicks_by_day(
        &self,
        link_ids: &[i64],
        since: NaiveDate,
    ) -> Result<Vec<LinkDayCount>, StoreError>;
}
