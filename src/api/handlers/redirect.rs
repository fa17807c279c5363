//! Handler for short code resolution.

use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
};
use std::net::SocketAddr;

use crate::api::dto::redirect::RedirectResponse;
use crate::domain::entities::ClientInfo;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Resolves a short code and records the visit.
///
/// # Endpoint
///
/// `GET /api/redirect/{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (cache, then store)
/// 2. Record the click: counter bump and click row in one transaction
/// 3. Return the target URL as JSON; the client navigates
///
/// # Click Recording
///
/// A link deleted between resolution and recording yields 404 and its cache
/// entry is dropped. Any other recording failure is logged and the target is
/// still returned, so a struggling store does not break navigation.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or deleted.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<RedirectResponse>, AppError> {
    let resolved = state.resolver.resolve(&code).await?;

    let client = ClientInfo {
        ip: Some(client_ip(&headers, addr, state.behind_proxy)),
        user_agent: header_value(&headers, header::USER_AGENT),
        referrer: header_value(&headers, header::REFERER),
    };

    match state
        .click_service
        .record_click(resolved.link_id, client)
        .await
    {
        Ok(_) => {}
        Err(e @ AppError::NotFound { .. }) => {
            state.resolver.invalidate(&code).await;
            return Err(e);
        }
        Err(e) => {
            tracing::warn!(code = %code, error = %e, "Failed to record click");
        }
    }

    Ok(Json(RedirectResponse {
        target_url: resolved.target_url,
    }))
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
