//! Code to target resolution for the redirect path.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::ResolvedLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Resolves short codes to their target, fronted by the resolver cache.
///
/// # Cache Strategy
///
/// - **Hit**: served without touching the store
/// - **Miss**: store lookup, then an asynchronous cache fill
/// - **Cache error**: logged, falls back to the store
///
/// Deleted and unknown codes are never cached.
///
/// # Staleness
///
/// The fill is not ordered against deletion: a fill spawned just before a
/// concurrent delete can land after that delete's [`Resolver::invalidate`], and
/// `resolve` then serves the deleted target until the entry's TTL expires. The
/// redirect handler still answers 404 in that window, because recording the
/// click fails with not-found and evicts the entry again.
pub struct Resolver<L: LinkRepository + ?Sized> {
    links: Arc<L>,
    cache: Arc<dyn CacheService>,
    ttl_seconds: Option<u64>,
}

impl<L: LinkRepository + ?Sized> Resolver<L> {
    /// Creates a new resolver. `ttl_seconds` overrides the cache's default TTL.
    pub fn new(links: Arc<L>, cache: Arc<dyn CacheService>, ttl_seconds: Option<u64>) -> Self {
        Self {
            links,
            cache,
            ttl_seconds,
        }
    }

    /// Resolves an active link by code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or deleted codes.
    pub async fn resolve(&self, code: &str) -> Result<ResolvedLink, AppError> {
        match self.cache.get_link(code).await {
            Ok(Some(resolved)) => {
                tracing::debug!(code, "Cache HIT");
                return Ok(resolved);
            }
            Ok(None) => tracing::debug!(code, "Cache MISS"),
            Err(e) => tracing::warn!(code, error = %e, "Cache lookup failed"),
        }

        let link = self
            .links
            .find_by_code(code)
            .await?
            .filter(|link| link.is_active())
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "code": code })))?;

        let resolved = link.resolved();

        let cache = self.cache.clone();
        let key = code.to_string();
        let entry = resolved.clone();
        let ttl = self.ttl_seconds;
        tokio::spawn(async move {
            if let Err(e) = cache.set_link(&key, &entry, ttl).await {
                tracing::warn!(code = %key, error = %e, "Failed to cache link");
            }
        });

        Ok(resolved)
    }

    /// Drops the cached entry for `code`, if any.
    pub async fn invalidate(&self, code: &str) {
        if let Err(e) = self.cache.invalidate(code).await {
            tracing::warn!(code, error = %e, "Failed to invalidate cached link");
        }
    }
}
