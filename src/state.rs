//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Instant;

use crate::application::services::{AnalyticsService, ClickService, LinkService, Resolver};
use crate::domain::repositories::{AnalyticsRepository, ClickRepository, LinkRepository};
use crate::infrastructure::cache::CacheService;

/// Handles to the services, built once in [`crate::server::run`].
///
/// Services hold their repositories as trait objects, so the same state works
/// over PostgreSQL and over the in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub click_service: Arc<ClickService<dyn ClickRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn AnalyticsRepository>>,
    pub resolver: Arc<Resolver<dyn LinkRepository>>,
    pub cache: Arc<dyn CacheService>,
    /// Read client IPs from proxy headers instead of the peer address.
    pub behind_proxy: bool,
    pub environment: String,
    pub started_at: Instant,
}

/// Everything needed to assemble an [`AppState`].
pub struct StateParts {
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
    pub cache: Arc<dyn CacheService>,
    pub cache_ttl_seconds: Option<u64>,
    pub analytics_max_days: u32,
    pub behind_proxy: bool,
    pub environment: String,
}

impl AppState {
    /// Wires services over the given repositories and cache.
    pub fn new(parts: StateParts) -> Self {
        let resolver = Resolver::new(
            parts.links.clone(),
            parts.cache.clone(),
            parts.cache_ttl_seconds,
        );

        Self {
            link_service: Arc::new(LinkService::new(parts.links)),
            click_service: Arc::new(ClickService::new(parts.clicks)),
            analytics_service: Arc::new(AnalyticsService::new(
                parts.analytics,
                parts.analytics_max_days,
            )),
            resolver: Arc::new(resolver),
            cache: parts.cache,
            behind_proxy: parts.behind_proxy,
            environment: parts.environment,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was built.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
