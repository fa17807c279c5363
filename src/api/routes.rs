//! API route configuration.
//!
//! Identity is established upstream; handlers only read the owner from the
//! `X-Owner-Id` header.

use crate::api::handlers::{
    batch_summary_handler, create_link_handler, delete_link_handler, link_stats_handler,
    link_summary_handler, list_links_handler, redirect_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /links`                   - Create a short link
/// - `GET    /links`                   - List links (`q`, `limit`, `offset`)
/// - `POST   /links/summary`           - Zero-filled series for several codes
/// - `GET    /links/{code}`            - Link with full click history
/// - `DELETE /links/{code}`            - Delete a link and its clicks
/// - `GET    /links/{code}/summary`    - Link with zero-filled series (`days`)
/// - `GET    /analytics/{code}/summary` - Same as above
/// - `GET    /redirect/{code}`         - Resolve a code and record the click
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route("/links/summary", post(batch_summary_handler))
        .route(
            "/links/{code}",
            get(link_stats_handler).delete(delete_link_handler),
        )
        .route("/links/{code}/summary", get(link_summary_handler))
        .route("/analytics/{code}/summary", get(link_summary_handler))
        .route("/redirect/{code}", get(redirect_handler))
}
