//! DTOs for link management and per-link statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Click, DayCount, Link};

/// Request to create a short link.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// Target URL; a missing scheme defaults to `https://`.
    #[validate(length(min = 1, max = 2048, message = "targetUrl must be 1-2048 characters"))]
    pub target_url: String,

    /// Optional caller-chosen code (6-8 letters or digits).
    pub code: Option<String>,
}

/// Link as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            code: link.code,
            target_url: link.target_url,
            clicks: link.clicks,
            last_clicked: link.last_clicked,
            created_at: link.created_at,
        }
    }
}

/// One recorded visit.
#[derive(Debug, Serialize)]
pub struct ClickInfo {
    pub ts: DateTime<Utc>,
    pub ip: Option<String>,
    pub ua: Option<String>,
    pub referrer: Option<String>,
}

impl From<Click> for ClickInfo {
    fn from(click: Click) -> Self {
        Self {
            ts: click.created_at,
            ip: click.ip,
            ua: click.user_agent,
            referrer: click.referrer,
        }
    }
}

/// Link with its day histogram and most recent clicks.
///
/// Used by both the full-history stats endpoint (sparse series) and the
/// windowed summary endpoints (zero-filled series).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatsResponse {
    #[serde(flatten)]
    pub link: LinkResponse,
    pub clicks_by_day: Vec<DayCount>,
    pub recent_clicks: Vec<ClickInfo>,
}

impl LinkStatsResponse {
    pub fn new(link: Link, clicks_by_day: Vec<DayCount>, recent: Vec<Click>) -> Self {
        Self {
            link: link.into(),
            clicks_by_day,
            recent_clicks: recent.into_iter().map(ClickInfo::from).collect(),
        }
    }
}
