//! Click entity representing a single visit of a short link.

use chrono::{DateTime, NaiveDate, Utc};

/// A click event recorded when a short link is resolved.
///
/// Immutable once written. `day` is `created_at` truncated to the UTC date and
/// is what the analytics queries group by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Client metadata captured at visit time.
///
/// All fields are optional to handle missing headers or proxies that strip them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// Input data for recording a new click event.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl NewClick {
    /// Builds a click for `link_id` stamped with `clicked_at`.
    pub fn new(link_id: i64, client: ClientInfo, clicked_at: DateTime<Utc>) -> Self {
        Self {
            link_id,
            ip: client.ip,
            user_agent: client.user_agent,
            referrer: client.referrer,
            clicked_at,
        }
    }

    /// The UTC calendar day the click is bucketed into.
    pub fn day(&self) -> NaiveDate {
        self.clicked_at.date_naive()
    }
}
