//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::contains_pattern;
use super::rows::LinkRow;
use crate::domain::entities::{Link, LinkQuery, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};

/// PostgreSQL repository for the link registry.
///
/// Code uniqueness is enforced by the `links_code_key` constraint; a duplicate
/// insert surfaces as [`StoreError::UniqueViolation`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (code, target_url, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, code, target_url, owner_id, clicks, last_clicked, is_deleted, created_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.target_url)
        .bind(&new_link.owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, target_url, owner_id, clicks, last_clicked, is_deleted, created_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<Link>, StoreError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, target_url, owner_id, clicks, last_clicked, is_deleted, created_at
            FROM links
            WHERE code = ANY($1) AND NOT is_deleted
            "#,
        )
        .bind(codes)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn list(&self, query: LinkQuery) -> Result<Vec<Link>, StoreError> {
        let pattern = query.search.as_deref().map(contains_pattern);

        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, target_url, owner_id, clicks, last_clicked, is_deleted, created_at
            FROM links
            WHERE NOT is_deleted
              AND ($1::text IS NULL
                   OR code ILIKE $1 ESCAPE '\'
                   OR target_url ILIKE $1 ESCAPE '\')
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Lock the link first; the click recorder takes the same row lock
        // before inserting, so the two never deadlock.
        let link_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM links WHERE code = $1 FOR UPDATE")
                .bind(code)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(link_id) = link_id else {
            return Ok(false);
        };

        let removed_clicks = sqlx::query("DELETE FROM clicks WHERE link_id = $1")
            .bind(link_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(link_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(code, link_id, removed_clicks, "Link deleted");
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
