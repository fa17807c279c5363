#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo, routing::get};
use axum_test::TestServer;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

use snaplink::api::handlers::health_handler;
use snaplink::api::routes::api_routes;
use snaplink::infrastructure::cache::NullCache;
use snaplink::infrastructure::memory::MemoryStore;
use snaplink::state::{AppState, StateParts};

/// Injects a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn create_memory_state(behind_proxy: bool) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());

    let state = AppState::new(StateParts {
        links: store.clone(),
        clicks: store.clone(),
        analytics: store.clone(),
        cache: Arc::new(NullCache::new()),
        cache_ttl_seconds: None,
        analytics_max_days: 365,
        behind_proxy,
        environment: "test".to_string(),
    });

    (state, store)
}

/// Full API plus health route over a fresh in-memory store.
pub fn make_server() -> (TestServer, Arc<MemoryStore>) {
    make_server_with(false)
}

pub fn make_server_with(behind_proxy: bool) -> (TestServer, Arc<MemoryStore>) {
    let (state, store) = create_memory_state(behind_proxy);

    let app = Router::new()
        .route("/healthz", get(health_handler))
        .nest("/api", api_routes())
        .layer(MockConnectInfoLayer)
        .with_state(state);

    (TestServer::new(app).unwrap(), store)
}

pub async fn create_test_link(pool: &PgPool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO links (code, target_url) VALUES ($1, $2) RETURNING id")
        .bind(code)
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_flagged_link(pool: &PgPool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (code, target_url, is_deleted) VALUES ($1, $2, TRUE) RETURNING id",
    )
    .bind(code)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn link_counters(pool: &PgPool, link_id: i64) -> (i64, Option<chrono::DateTime<chrono::Utc>>) {
    sqlx::query_as("SELECT clicks, last_clicked FROM links WHERE id = $1")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
