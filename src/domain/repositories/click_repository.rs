//! Repository trait for click recording.

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Outcome of a counter reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Links inspected.
    pub scanned: u64,
    /// Links whose `clicks` or `last_clicked` disagreed with the click rows and were rewritten.
    pub corrected: u64,
}

/// Repository interface for the click recorder.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - In-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click and bumps the owning link's counter atomically.
    ///
    /// Either both the click row and the counter update are persisted, or neither is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingLink`] if the link does not exist (nothing is written).
    async fn record(&self, new_click: NewClick) -> Result<Click, StoreError>;

    /// Most recent clicks of a link, newest first.
    async fn recent(&self, link_id: i64, limit: i64) -> Result<Vec<Click>, StoreError>;

    /// Recomputes every link's denormalized counters from its click rows.
    async fn reconcile_counters(&self) -> Result<ReconcileReport, StoreError>;
}
