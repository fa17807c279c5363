//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx with
//! parameterized runtime queries. Driver errors are translated into
//! [`StoreError`] here, so no `sqlx` type leaks past this module.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, listing and transactional deletion
//! - [`PgClickRepository`] - Transactional click recording and counter reconciliation
//! - [`PgAnalyticsRepository`] - Grouped per-day aggregation

pub mod pg_analytics_repository;
pub mod pg_click_repository;
pub mod pg_link_repository;
mod rows;

pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;

use crate::domain::repositories::StoreError;

/// SQLSTATE raised when `statement_timeout` cancels a query.
const QUERY_CANCELED: &str = "57014";

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(e.to_string()),
            sqlx::Error::Database(db) => {
                if db.is_unique_violation() {
                    StoreError::UniqueViolation {
                        constraint: db.constraint().map(str::to_string),
                    }
                } else if db.is_foreign_key_violation() {
                    StoreError::MissingLink
                } else if db.code().as_deref() == Some(QUERY_CANCELED) {
                    StoreError::Timeout
                } else {
                    StoreError::Query(e.to_string())
                }
            }
            _ => StoreError::Query(e.to_string()),
        }
    }
}

/// Builds an `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
