//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL link with its denormalized click counters.
///
/// `clicks` and `last_clicked` are maintained by the click recorder in the same
/// transaction that appends the click row, so `clicks` equals the number of
/// click rows for this link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub owner_id: Option<String>,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a freshly inserted link with zero clicks.
    pub fn new(
        id: i64,
        code: String,
        target_url: String,
        owner_id: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            target_url,
            owner_id,
            clicks: 0,
            last_clicked: None,
            is_deleted: false,
            created_at,
        }
    }

    /// Returns true if the link is visible to lookups that exclude deleted rows.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Projection used by the redirect path and its cache.
    pub fn resolved(&self) -> ResolvedLink {
        ResolvedLink {
            link_id: self.id,
            target_url: self.target_url.clone(),
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
    pub owner_id: Option<String>,
}

/// The minimum a redirect needs: where to go and which link to credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLink {
    pub link_id: i64,
    pub target_url: String,
}

/// Search and pagination criteria for link listings.
#[derive(Debug, Clone, Default)]
pub struct LinkQuery {
    /// Case-insensitive substring matched against `code` and `target_url`.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
