//! Handlers for windowed analytics.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::collections::HashMap;
use validator::Validate;

use crate::api::dto::analytics::{
    BatchSummaryRequest, DEFAULT_BATCH_DAYS, DEFAULT_SUMMARY_DAYS, SummaryParams,
};
use crate::api::dto::links::LinkStatsResponse;
use crate::domain::entities::DayCount;
use crate::error::AppError;
use crate::state::AppState;

/// Clicks listed by the summary endpoints.
const SUMMARY_RECENT_CLICKS: i64 = 50;

/// Returns a link with a zero-filled click series over the last `days` days.
///
/// # Endpoints
///
/// - `GET /api/links/{code}/summary?days=30`
/// - `GET /api/analytics/{code}/summary?days=30`
///
/// `days` defaults to 30 and is capped by `ANALYTICS_MAX_DAYS`.
pub async fn link_summary_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<LinkStatsResponse>, AppError> {
    let days = params.days.unwrap_or(DEFAULT_SUMMARY_DAYS);

    let link = state.link_service.get_link(&code).await?;

    let series = state
        .analytics_service
        .clicks_by_day(link.id, days)
        .await?;
    let recent = state
        .click_service
        .recent_clicks(link.id, SUMMARY_RECENT_CLICKS)
        .await?;

    Ok(Json(LinkStatsResponse::new(link, series, recent)))
}

/// Returns zero-filled series for several codes at once.
///
/// # Endpoint
///
/// `POST /api/links/summary`
///
/// # Request Body
///
/// ```json
/// { "codes": ["abc123", "xyz789"], "days": 7 }
/// ```
///
/// # Response
///
/// Object keyed by code. Unknown and deleted codes are left out.
pub async fn batch_summary_handler(
    State(state): State<AppState>,
    Json(payload): Json<BatchSummaryRequest>,
) -> Result<Json<HashMap<String, Vec<DayCount>>>, AppError> {
    payload.validate()?;

    let days = payload.days.unwrap_or(DEFAULT_BATCH_DAYS);

    let links = state.link_service.find_by_codes(&payload.codes).await?;
    let ids: Vec<i64> = links.iter().map(|l| l.id).collect();

    let mut by_id = state
        .analytics_service
        .batch_clicks_by_day(&ids, days)
        .await?;

    let out = links
        .into_iter()
        .filter_map(|link| by_id.remove(&link.id).map(|series| (link.code, series)))
        .collect();

    Ok(Json(out))
}
