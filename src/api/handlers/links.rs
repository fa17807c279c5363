//! Handlers for link management endpoints (create, list, stats, delete).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse, LinkStatsResponse};
use crate::api::dto::pagination::ListLinksParams;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the caller's identity, set by the upstream auth layer.
pub const OWNER_HEADER: &str = "x-owner-id";

/// Clicks listed by the full-history stats endpoint.
const STATS_RECENT_CLICKS: i64 = 20;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "targetUrl": "example.com/page", "code": "promo42" }
/// ```
///
/// `code` is optional; without it a random 6-8 character code is allocated.
///
/// # Errors
///
/// - 400 for an invalid target URL or malformed code
/// - 409 if the requested code is taken
/// - 503 if no free code could be allocated
pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let owner_id = headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let link = state
        .link_service
        .create_link(&payload.target_url, payload.code.as_deref(), owner_id)
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists active links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?q=<search>&limit=100&offset=0`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<ListLinksParams>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let (limit, offset) = params
        .validate_and_get_limit_offset()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let links = state
        .link_service
        .list_links(params.q, limit, offset)
        .await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Returns a link with its full click history.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// `clicksByDay` lists only days that have clicks; `recentClicks` holds the
/// 20 newest visits.
pub async fn link_stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkStatsResponse>, AppError> {
    let link = state.link_service.get_link(&code).await?;

    let history = state.analytics_service.clicks_history(link.id).await?;
    let recent = state
        .click_service
        .recent_clicks(link.id, STATS_RECENT_CLICKS)
        .await?;

    Ok(Json(LinkStatsResponse::new(link, history, recent)))
}

/// Deletes a link and all of its clicks.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Response Codes
///
/// - **204 No Content**: deleted
/// - **404 Not Found**: no link has this code
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.link_service.delete_by_code(&code).await? {
        return Err(AppError::not_found(
            "Link not found",
            json!({ "code": code }),
        ));
    }

    state.resolver.invalidate(&code).await;

    Ok(StatusCode::NO_CONTENT)
}
