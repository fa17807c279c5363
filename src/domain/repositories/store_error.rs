//! Typed failures reported by store implementations.

/// Name of the unique constraint guarding `links.code`.
///
/// Both store implementations report it in [`StoreError::UniqueViolation`] so
/// the code allocator can tell a benign collision from any other conflict.
pub const LINK_CODE_CONSTRAINT: &str = "links_code_key";

/// Failure kinds surfaced at the repository boundary.
///
/// Unique violations are a distinct variant rather than an opaque database
/// error, which lets callers retry code allocation by pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {}", constraint.as_deref().unwrap_or("unknown"))]
    UniqueViolation { constraint: Option<String> },

    #[error("referenced link does not exist")]
    MissingLink,

    #[error("store operation timed out")]
    Timeout,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// A unique violation on the code column, i.e. a code collision.
    pub fn is_code_collision(&self) -> bool {
        matches!(
            self,
            StoreError::UniqueViolation { constraint: Some(c) } if c == LINK_CODE_CONSTRAINT
        )
    }

    /// Failures caused by the store being slow or unreachable rather than by the request.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Timeout | StoreError::Unavailable(_))
    }

    pub(crate) fn code_collision() -> Self {
        StoreError::UniqueViolation {
            constraint: Some(LINK_CODE_CONSTRAINT.to_string()),
        }
    }
}
