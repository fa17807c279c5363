//! Mutex-guarded in-memory implementation of the store contract.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{
    Click, DayCount, Link, LinkDayCount, LinkQuery, NewClick, NewLink,
};
use crate::domain::repositories::{
    AnalyticsRepository, ClickRepository, LinkRepository, ReconcileReport, StoreError,
};

#[derive(Default)]
struct State {
    next_link_id: i64,
    next_click_id: i64,
    links: BTreeMap<i64, Link>,
    codes: HashMap<String, i64>,
    clicks: Vec<Click>,
}

/// Single-process store holding links and clicks in memory.
///
/// Every operation runs under one lock, so inserts are atomic with respect to
/// the code index and click recording updates the counter and appends the row
/// as one step.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Marks a link as deleted without removing it.
    ///
    /// Mirrors rows flagged by external tooling in the PostgreSQL store.
    pub fn flag_deleted(&self, code: &str) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        let Some(id) = state.codes.get(code).copied() else {
            return Ok(false);
        };
        Ok(match state.links.get_mut(&id) {
            Some(link) => {
                link.is_deleted = true;
                true
            }
            None => false,
        })
    }

    /// Appends a click row without touching the link counter.
    ///
    /// Produces counter drift on purpose; used to exercise reconciliation.
    pub fn append_raw_click(&self, new_click: NewClick) -> Result<Click, StoreError> {
        let mut state = self.lock()?;
        if !state.links.contains_key(&new_click.link_id) {
            return Err(StoreError::MissingLink);
        }
        Ok(push_click(&mut state, new_click))
    }
}

fn push_click(state: &mut State, new_click: NewClick) -> Click {
    state.next_click_id += 1;
    let click = Click {
        id: state.next_click_id,
        link_id: new_click.link_id,
        day: new_click.day(),
        ip: new_click.ip,
        user_agent: new_click.user_agent,
        referrer: new_click.referrer,
        created_at: new_click.clicked_at,
    };
    state.clicks.push(click.clone());
    click
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let mut state = self.lock()?;
        if state.codes.contains_key(&new_link.code) {
            return Err(StoreError::code_collision());
        }

        state.next_link_id += 1;
        let link = Link::new(
            state.next_link_id,
            new_link.code,
            new_link.target_url,
            new_link.owner_id,
            Utc::now(),
        );
        state.codes.insert(link.code.clone(), link.id);
        state.links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .codes
            .get(code)
            .and_then(|id| state.links.get(id))
            .cloned())
    }

    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<Link>, StoreError> {
        let state = self.lock()?;
        Ok(codes
            .iter()
            .filter_map(|code| state.codes.get(code))
            .filter_map(|id| state.links.get(id))
            .filter(|link| link.is_active())
            .cloned()
            .collect())
    }

    async fn list(&self, query: LinkQuery) -> Result<Vec<Link>, StoreError> {
        let state = self.lock()?;
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut links: Vec<Link> = state
            .links
            .values()
            .filter(|link| link.is_active())
            .filter(|link| match &needle {
                Some(n) => {
                    link.code.to_lowercase().contains(n.as_str())
                        || link.target_url.to_lowercase().contains(n.as_str())
                }
                None => true,
            })
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(links
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        let Some(id) = state.codes.remove(code) else {
            return Ok(false);
        };
        state.clicks.retain(|c| c.link_id != id);
        state.links.remove(&id);
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn record(&self, new_click: NewClick) -> Result<Click, StoreError> {
        let mut state = self.lock()?;
        let clicked_at = new_click.clicked_at;

        let link = state
            .links
            .get_mut(&new_click.link_id)
            .ok_or(StoreError::MissingLink)?;
        link.clicks += 1;
        link.last_clicked = link.last_clicked.max(Some(clicked_at));

        Ok(push_click(&mut state, new_click))
    }

    async fn recent(&self, link_id: i64, limit: i64) -> Result<Vec<Click>, StoreError> {
        let state = self.lock()?;
        let mut clicks: Vec<Click> = state
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        clicks.truncate(limit.max(0) as usize);
        Ok(clicks)
    }

    async fn reconcile_counters(&self) -> Result<ReconcileReport, StoreError> {
        let mut state = self.lock()?;
        let state = &mut *state;

        let mut actual: HashMap<i64, (i64, Option<chrono::DateTime<Utc>>)> = HashMap::new();
        for click in &state.clicks {
            let entry = actual.entry(click.link_id).or_default();
            entry.0 += 1;
            entry.1 = entry.1.max(Some(click.created_at));
        }

        let mut report = ReconcileReport::default();
        for link in state.links.values_mut() {
            report.scanned += 1;
            let (clicks, last_clicked) = actual.get(&link.id).copied().unwrap_or_default();
            if link.clicks != clicks || link.last_clicked != last_clicked {
                link.clicks = clicks;
                link.last_clicked = last_clicked;
                report.corrected += 1;
            }
        }
        Ok(report)
    }
}

#[async_trait]
impl AnalyticsRepository for MemoryStore {
    async fn clicks_by_day(
        &self,
        link_id: i64,
        since: Option<NaiveDate>,
    ) -> Result<Vec<DayCount>, StoreError> {
        let state = self.lock()?;
        let mut buckets: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for click in state.clicks.iter().filter(|c| c.link_id == link_id) {
            if since.is_none_or(|s| click.day >= s) {
                *buckets.entry(click.day).or_default() += 1;
            }
        }
        Ok(buckets
            .into_iter()
            .map(|(date, count)| DayCount::new(date, count))
            .collect())
    }

    async fn batch_clicks_by_day(
        &self,
        link_ids: &[i64],
        since: NaiveDate,
    ) -> Result<Vec<LinkDayCount>, StoreError> {
        let state = self.lock()?;
        let mut buckets: BTreeMap<(i64, NaiveDate), i64> = BTreeMap::new();
        for click in state
            .clicks
            .iter()
            .filter(|c| link_ids.contains(&c.link_id) && c.day >= since)
        {
            *buckets.entry((click.link_id, click.day)).or_default() += 1;
        }
        Ok(buckets
            .into_iter()
            .map(|((link_id, date), count)| LinkDayCount {
                link_id,
                date,
                count,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ClientInfo;
    use chrono::{Duration, TimeZone};

    fn new_link(code: &str) -> NewLink {
        NewLink {
            code: code.to_string(),
            target_url: format!("https://example.com/{code}"),
            owner_id: None,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let store = MemoryStore::new();
        store.insert(new_link("abc123")).await.unwrap();

        let err = store.insert(new_link("abc123")).await.unwrap_err();
        assert!(err.is_code_collision());
    }

    #[tokio::test]
    async fn test_record_updates_counter_and_appends_click() {
        let store = MemoryStore::new();
        let link = store.insert(new_link("abc123")).await.unwrap();
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

        for _ in 0..3 {
            store
                .record(NewClick::new(link.id, ClientInfo::default(), at))
                .await
                .unwrap();
        }

        let stored = store.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(stored.clicks, 3);
        assert_eq!(stored.last_clicked, Some(at));
        assert_eq!(store.recent(link.id, 10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_record_on_missing_link_writes_nothing() {
        let store = MemoryStore::new();

        let err = store
            .record(NewClick::new(404, ClientInfo::default(), Utc::now()))
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::MissingLink);
        assert!(store.recent(404, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_link_and_clicks() {
        let store = MemoryStore::new();
        let link = store.insert(new_link("abc123")).await.unwrap();
        store
            .record(NewClick::new(link.id, ClientInfo::default(), Utc::now()))
            .await
            .unwrap();

        assert!(store.delete_by_code("abc123").await.unwrap());
        assert!(!store.delete_by_code("abc123").await.unwrap());
        assert!(store.find_by_code("abc123").await.unwrap().is_none());
        assert!(store.recent(link.id, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let store = MemoryStore::new();
        store.insert(new_link("alpha1")).await.unwrap();
        store.insert(new_link("bravo2")).await.unwrap();
        store.insert(new_link("ALPHA3")).await.unwrap();
        store.flag_deleted("bravo2").unwrap();

        let all = store
            .list(LinkQuery {
                search: None,
                limit: 100,
                offset: 0,
            })
            .await
            .unwrap();
        let codes: Vec<_> = all.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["ALPHA3", "alpha1"]);

        let matched = store
            .list(LinkQuery {
                search: Some("Alpha".to_string()),
                limit: 1,
                offset: 1,
            })
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].code, "alpha1");
    }

    #[tokio::test]
    async fn test_clicks_by_day_groups_and_respects_since() {
        let store = MemoryStore::new();
        let link = store.insert(new_link("abc123")).await.unwrap();
        let today = Utc.with_ymd_and_hms(2026, 5, 10, 9, 0, 0).unwrap();

        for at in [today, today, today - Duration::days(2), today - Duration::days(9)] {
            store
                .record(NewClick::new(link.id, ClientInfo::default(), at))
                .await
                .unwrap();
        }

        let since = NaiveDate::from_ymd_opt(2026, 5, 4);
        let rows = store.clicks_by_day(link.id, since).await.unwrap();
        assert_eq!(
            rows,
            vec![
                DayCount::new(NaiveDate::from_ymd_opt(2026, 5, 8).unwrap(), 1),
                DayCount::new(NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(), 2),
            ]
        );

        let all = store.clicks_by_day(link.id, None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_reconcile_repairs_drift() {
        let store = MemoryStore::new();
        let link = store.insert(new_link("abc123")).await.unwrap();
        store.insert(new_link("idle00")).await.unwrap();
        let at = Utc::now();
        store
            .append_raw_click(NewClick::new(link.id, ClientInfo::default(), at))
            .unwrap();

        let report = store.reconcile_counters().await.unwrap();
        assert_eq!(report, ReconcileReport { scanned: 2, corrected: 1 });

        let stored = store.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(stored.clicks, 1);
        assert_eq!(stored.last_clicked, Some(at));

        let again = store.reconcile_counters().await.unwrap();
        assert_eq!(again.corrected, 0);
    }
}
