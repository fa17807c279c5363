//! PostgreSQL implementation of analytics repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{DayCount, LinkDayCount};
use crate::domain::repositories::{AnalyticsRepository, StoreError};

/// PostgreSQL repository for day-bucketed click counts.
///
/// Groups on the precomputed `clicks.day` column (indexed with `link_id`), so
/// no per-row timestamp truncation happens at query time.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn clicks_by_day(
        &self,
        link_id: i64,
        since: Option<NaiveDate>,
    ) -> Result<Vec<DayCount>, StoreError> {
        let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT day, COUNT(*) AS count
            FROM clicks
            WHERE link_id = $1
              AND ($2::date IS NULL OR day >= $2)
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(link_id)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(date, count)| DayCount::new(date, count))
            .collect())
    }

    async fn batch_clicks_by_day(
        &self,
        link_ids: &[i64],
        since: NaiveDate,
    ) -> Result<Vec<LinkDayCount>, StoreError> {
        if link_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(i64, NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT link_id, day, COUNT(*) AS count
            FROM clicks
            WHERE link_id = ANY($1)
              AND day >= $2
            GROUP BY link_id, day
            ORDER BY link_id, day
            "#,
        )
        .bind(link_ids)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(link_id, date, count)| LinkDayCount {
                link_id,
                date,
                count,
            })
            .collect())
    }
}
