//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkQuery, NewLink};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Repository interface for the link registry.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - In-process store
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link in a single atomic statement.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] naming
    /// [`super::LINK_CODE_CONSTRAINT`] if the code is already taken.
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds a link by its short code, including rows flagged as deleted.
    ///
    /// Filtering of deleted rows is the caller's decision.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError>;

    /// Finds all non-deleted links whose code is in `codes`.
    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<Link>, StoreError>;

    /// Lists non-deleted links, newest first.
    async fn list(&self, query: LinkQuery) -> Result<Vec<Link>, StoreError>;

    /// Deletes a link and all of its clicks as one unit.
    ///
    /// Returns `Ok(false)` if no link has this code.
    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError>;

    /// Cheap round-trip used by health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
