//! Repository trait definitions for the domain layer.
//!
//! These traits are the store contract: implementations live in
//! `crate::infrastructure::persistence` (PostgreSQL) and
//! `crate::infrastructure::memory` (in-process).
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link registry: insert, lookup, listing, deletion
//! - [`ClickRepository`] - Transactional click recording
//! - [`AnalyticsRepository`] - Grouped per-day click aggregation
//!
//! All operations fail with [`StoreError`], which keeps unique violations
//! distinguishable from other failures.
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall`. See integration tests in
//! `tests/repository_*.rs` for usage examples against PostgreSQL.

pub mod analytics_repository;
pub mod click_repository;
pub mod link_repository;
pub mod store_error;

pub use analytics_repository::AnalyticsRepository;
pub use click_repository::{ClickRepository, ReconcileReport};
pub use link_repository::LinkRepository;
pub use store_error::{LINK_CODE_CONSTRAINT, StoreError};

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
