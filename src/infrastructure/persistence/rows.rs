//! Row types decoded from PostgreSQL result sets.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::entities::{Click, Link};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LinkRow {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub owner_id: Option<String>,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            code: r.code,
            target_url: r.target_url,
            owner_id: r.owner_id,
            clicks: r.clicks,
            last_clicked: r.last_clicked,
            is_deleted: r.is_deleted,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ClickRow {
    pub id: i64,
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            link_id: r.link_id,
            ip: r.ip,
            user_agent: r.user_agent,
            referrer: r.referrer,
            day: r.day,
            created_at: r.created_at,
        }
    }
}
