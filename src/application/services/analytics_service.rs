//! Day-bucketed click analytics.

use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::day_series::{fill_from_rows, window_start};
use crate::domain::entities::DayCount;
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

/// Default upper bound on the `days` window.
pub const DEFAULT_MAX_DAYS: u32 = 365;

/// Service producing per-day click histograms.
///
/// Every windowed series covers exactly `days` consecutive UTC dates ending
/// today, oldest first, with zeros for days without clicks. `days` is clamped
/// to the configured maximum and `0` yields an empty series.
pub struct AnalyticsService<A: AnalyticsRepository + ?Sized> {
    repository: Arc<A>,
    max_days: u32,
}

impl<A: AnalyticsRepository + ?Sized> AnalyticsService<A> {
    /// Creates a new analytics service with the given window cap.
    pub fn new(repository: Arc<A>, max_days: u32) -> Self {
        Self {
            repository,
            max_days,
        }
    }

    /// Largest window served.
    pub fn max_days(&self) -> u32 {
        self.max_days
    }

    fn clamp_days(&self, days: u32) -> u32 {
        days.min(self.max_days)
    }

    /// Zero-filled click counts of one link over the last `days` days.
    ///
    /// An unknown `link_id` yields an all-zero series.
    pub async fn clicks_by_day(&self, link_id: i64, days: u32) -> Result<Vec<DayCount>, AppError> {
        self.clicks_by_day_as_of(link_id, days, Utc::now().date_naive())
            .await
    }

    async fn clicks_by_day_as_of(
        &self,
        link_id: i64,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<DayCount>, AppError> {
        let days = self.clamp_days(days);
        let Some(start) = window_start(today, days) else {
            return Ok(Vec::new());
        };

        let rows = self.repository.clicks_by_day(link_id, Some(start)).await?;
        Ok(fill_from_rows(&rows, days, today))
    }

    /// Zero-filled series for several links, fetched with one grouped query.
    ///
    /// Every requested id is a key of the result, even without clicks.
    /// Duplicate ids are collapsed.
    pub async fn batch_clicks_by_day(
        &self,
        link_ids: &[i64],
        days: u32,
    ) -> Result<HashMap<i64, Vec<DayCount>>, AppError> {
        self.batch_clicks_by_day_as_of(link_ids, days, Utc::now().date_naive())
            .await
    }

    async fn batch_clicks_by_day_as_of(
        &self,
        link_ids: &[i64],
        days: u32,
        today: NaiveDate,
    ) -> Result<HashMap<i64, Vec<DayCount>>, AppError> {
        let mut seen = HashSet::with_capacity(link_ids.len());
        let ids: Vec<i64> = link_ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let days = self.clamp_days(days);
        let Some(start) = window_start(today, days) else {
            return Ok(ids.into_iter().map(|id| (id, Vec::new())).collect());
        };

        let rows = if ids.is_empty() {
            Vec::new()
        } else {
            self.repository.batch_clicks_by_day(&ids, start).await?
        };

        let mut per_link: HashMap<i64, Vec<DayCount>> = HashMap::with_capacity(ids.len());
        for row in rows {
            per_link
                .entry(row.link_id)
                .or_default()
                .push(DayCount::new(row.date, row.count));
        }

        Ok(ids
            .into_iter()
            .map(|id| {
                let sparse = per_link.remove(&id).unwrap_or_default();
                (id, fill_from_rows(&sparse, days, today))
            })
            .collect())
    }

    /// Full click history of a link: only days with clicks, ascending.
    pub async fn clicks_history(&self, link_id: i64) -> Result<Vec<DayCount>, AppError> {
        Ok(self.repository.clicks_by_day(link_id, None).await?)
    }
}
