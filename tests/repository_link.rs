mod common;

use sqlx::PgPool;
use std::sync::Arc;
use snaplink::domain::entities::{LinkQuery, NewLink};
use snaplink::domain::repositories::LinkRepository;
use snaplink::infrastructure::persistence::PgLinkRepository;

fn new_link(code: &str, url: &str) -> NewLink {
    NewLink {
        code: code.to_string(),
        target_url: url.to_string(),
        owner_id: None,
    }
}

#[sqlx::test]
async fn test_insert_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .insert(NewLink {
            code: "abc123".to_string(),
            target_url: "https://example.com/".to_string(),
            owner_id: Some("user-1".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(link.code, "abc123");
    assert_eq!(link.owner_id.as_deref(), Some("user-1"));
    assert_eq!(link.clicks, 0);
    assert!(link.last_clicked.is_none());
    assert!(!link.is_deleted);
}

#[sqlx::test]
async fn test_insert_duplicate_code_is_collision(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.insert(new_link("dup123", "https://a.example/"))
        .await
        .unwrap();
    let err = repo
        .insert(new_link("dup123", "https://b.example/"))
        .await
        .unwrap_err();

    assert!(err.is_code_collision());
}

#[sqlx::test]
async fn test_find_by_code_includes_flagged(pool: PgPool) {
    common::create_flagged_link(&pool, "gone01", "https://example.com/").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_code("gone01").await.unwrap().unwrap();
    assert!(link.is_deleted);

    assert!(repo.find_by_code("absent").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_find_by_codes_skips_flagged_and_unknown(pool: PgPool) {
    common::create_test_link(&pool, "live01", "https://example.com/1").await;
    common::create_flagged_link(&pool, "gone01", "https://example.com/2").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let links = repo
        .find_by_codes(&[
            "live01".to_string(),
            "gone01".to_string(),
            "nope01".to_string(),
        ])
        .await
        .unwrap();

    assert_eq!(links.len(), 1);
    assert_eq!(links[0].code, "live01");
}

#[sqlx::test]
async fn test_list_search_is_case_insensitive_and_literal(pool: PgPool) {
    common::create_test_link(&pool, "rust01", "https://rust-lang.org/").await;
    common::create_test_link(&pool, "pct001", "https://example.com/100%25").await;
    common::create_test_link(&pool, "other1", "https://example.org/").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let found = repo
        .list(LinkQuery {
            search: Some("RUST".to_string()),
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].code, "rust01");

    let found = repo
        .list(LinkQuery {
            search: Some("%".to_string()),
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].code, "pct001");
}

#[sqlx::test]
async fn test_list_newest_first_with_paging(pool: PgPool) {
    for code in ["page01", "page02", "page03"] {
        common::create_test_link(&pool, code, "https://example.com/").await;
    }
    common::create_flagged_link(&pool, "page04", "https://example.com/").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let all = repo
        .list(LinkQuery {
            search: None,
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    let codes: Vec<&str> = all.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["page03", "page02", "page01"]);

    let page = repo
        .list(LinkQuery {
            search: None,
            limit: 1,
            offset: 1,
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].code, "page02");
}

#[sqlx::test]
async fn test_delete_removes_link_and_clicks(pool: PgPool) {
    let link_id = common::create_test_link(&pool, "del001", "https://example.com/").await;
    sqlx::query("INSERT INTO clicks (link_id, day) VALUES ($1, CURRENT_DATE), ($1, CURRENT_DATE)")
        .bind(link_id)
        .execute(&pool)
        .await
        .unwrap();
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    assert!(repo.delete_by_code("del001").await.unwrap());
    assert!(!repo.delete_by_code("del001").await.unwrap());

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks WHERE link_id = $1")
        .bind(link_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(repo.find_by_code("del001").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
