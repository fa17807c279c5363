//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, database connections, cache setup, and Axum server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{AnalyticsRepository, ClickRepository, LinkRepository};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::persistence::{
    PgAnalyticsRepository, PgClickRepository, PgLinkRepository,
};
use crate::routes::app_router;
use crate::state::{AppState, StateParts};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// The three repository handles the services are built from.
pub struct Repositories {
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
}

impl Repositories {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        let pool = Arc::new(pool);
        Self {
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool.clone())),
            analytics: Arc::new(PgAnalyticsRepository::new(pool)),
        }
    }

    /// All three traits served by one in-memory store.
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            links: store.clone(),
            clicks: store.clone(),
            analytics: store,
        }
    }
}

/// Opens the connection pool with the configured limits and timeouts.
///
/// `statement_timeout` is set on every connection, so a stuck query fails with
/// a timeout instead of holding a pool slot.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres storage backend")?;

    let options = PgConnectOptions::from_str(database_url)
        .context("Invalid DATABASE_URL")?
        .options([(
            "statement_timeout",
            config.db_statement_timeout_ms.to_string(),
        )]);

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Connects to Redis if `redis_url` is set, falling back to [`NullCache`].
///
/// Shared by the server and the admin CLI, so both evict from the same cache.
pub async fn connect_cache(redis_url: Option<&str>, ttl_seconds: u64) -> Arc<dyn CacheService> {
    let Some(redis_url) = redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The store (PostgreSQL pool with migrations, or the in-memory store)
/// - Redis cache (or NullCache fallback)
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repositories = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_pool(&config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");

            Repositories::postgres(pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Repositories::memory()
        }
    };

    let cache = connect_cache(config.redis_url.as_deref(), config.cache_ttl_seconds).await;

    let state = AppState::new(StateParts {
        links: repositories.links,
        clicks: repositories.clicks,
        analytics: repositories.analytics,
        cache,
        cache_ttl_seconds: Some(config.cache_ttl_seconds),
        analytics_max_days: config.analytics_max_days,
        behind_proxy: config.behind_proxy,
        environment: config.environment.clone(),
    });

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
