//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::entities::ResolvedLink;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching resolved short links on the redirect path.
///
/// Implementations must be thread-safe and fail open: a broken cache degrades
/// to store lookups, it never fails a redirect.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Looks up the resolved link for a short code.
    ///
    /// Returns `Ok(None)` on a miss.
    async fn get_link(&self, code: &str) -> CacheResult<Option<ResolvedLink>>;

    /// Stores a resolved link with an optional TTL in seconds
    /// (implementation default if `None`).
    async fn set_link(
        &self,
        code: &str,
        link: &ResolvedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached entry. Called when a link is deleted or found missing.
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
