//! Click recording service.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{Click, ClientInfo, NewClick};
use crate::domain::repositories::{ClickRepository, ReconcileReport, StoreError};
use crate::error::AppError;

/// Service recording visits to short links.
///
/// Each visit becomes one click row plus a counter bump on the link, written
/// together by the repository in a single transaction.
pub struct ClickService<C: ClickRepository + ?Sized> {
    repository: Arc<C>,
}

impl<C: ClickRepository + ?Sized> ClickService<C> {
    /// Creates a new click service.
    pub fn new(repository: Arc<C>) -> Self {
        Self { repository }
    }

    /// Records a click for `link_id`, timestamped now.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link no longer exists; nothing is
    /// written in that case. Other store failures surface as [`AppError::Store`].
    pub async fn record_click(&self, link_id: i64, client: ClientInfo) -> Result<Click, AppError> {
        let new_click = NewClick::new(link_id, client, Utc::now());

        match self.repository.record(new_click).await {
            Ok(click) => {
                metrics::counter!("clicks_recorded_total").increment(1);
                Ok(click)
            }
            Err(StoreError::MissingLink) => Err(AppError::not_found(
                "Link not found",
                json!({ "link_id": link_id }),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent clicks of a link, newest first.
    pub async fn recent_clicks(&self, link_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        Ok(self.repository.recent(link_id, limit.max(0)).await?)
    }

    /// Rewrites every link's `clicks` and `last_clicked` from its click rows.
    pub async fn reconcile(&self) -> Result<ReconcileReport, AppError> {
        let report = self.repository.reconcile_counters().await?;
        tracing::info!(
            scanned = report.scanned,
            corrected = report.corrected,
            "Click counters reconciled"
        );
        Ok(report)
    }
}
