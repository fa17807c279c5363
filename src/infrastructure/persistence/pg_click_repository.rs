//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::ClickRow;
use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, ReconcileReport, StoreError};

/// PostgreSQL repository for click recording.
///
/// Each click is written in its own transaction together with the owning
/// link's counter update.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<Click, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Counter first: it takes the link row lock that deletion also takes,
        // and tells us whether the link still exists.
        let updated = sqlx::query(
            r#"
            UPDATE links
            SET clicks = clicks + 1, last_clicked = GREATEST(last_clicked, $2)
            WHERE id = $1
            "#,
        )
        .bind(new_click.link_id)
        .bind(new_click.clicked_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(StoreError::MissingLink);
        }

        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (link_id, ip, user_agent, referrer, day, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, link_id, ip, user_agent, referrer, day, created_at
            "#,
        )
        .bind(new_click.link_id)
        .bind(&new_click.ip)
        .bind(&new_click.user_agent)
        .bind(&new_click.referrer)
        .bind(new_click.day())
        .bind(new_click.clicked_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn recent(&self, link_id: i64, limit: i64) -> Result<Vec<Click>, StoreError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, link_id, ip, user_agent, referrer, day, created_at
            FROM clicks
            WHERE link_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(link_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn reconcile_counters(&self) -> Result<ReconcileReport, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Blocks concurrent click inserts so counts cannot move while being rewritten.
        sqlx::query("LOCK TABLE clicks IN SHARE MODE")
            .execute(&mut *tx)
            .await?;

        let (scanned, corrected): (i64, i64) = sqlx::query_as(
            r#"
            WITH actual AS (
                SELECT l.id, COUNT(c.id) AS clicks, MAX(c.created_at) AS last_clicked
                FROM links l
                LEFT JOIN clicks c ON c.link_id = l.id
                GROUP BY l.id
            ),
            fixed AS (
                UPDATE links l
                SET clicks = a.clicks, last_clicked = a.last_clicked
                FROM actual a
                WHERE l.id = a.id
                  AND (l.clicks <> a.clicks OR l.last_clicked IS DISTINCT FROM a.last_clicked)
                RETURNING l.id
            )
            SELECT
                (SELECT COUNT(*) FROM actual) AS scanned,
                (SELECT COUNT(*) FROM fixed) AS corrected
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ReconcileReport {
            scanned: scanned.max(0) as u64,
            corrected: corrected.max(0) as u64,
        })
    }
}
