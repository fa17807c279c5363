//! Link creation, lookup, listing and deletion.

use std::sync::Arc;

use crate::domain::entities::{Link, LinkQuery, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{
    ATTEMPTS_PER_LENGTH, MAX_CODE_LENGTH, MIN_CODE_LENGTH, generate_code, validate_custom_code,
};
use crate::utils::url_normalizer::normalize_target;
use serde_json::json;

/// Largest page `list_links` returns.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Page size used when the caller does not pass one.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Service for the link registry.
///
/// Code uniqueness is never checked up front: every candidate goes straight to
/// the store's atomic insert, and a unique violation on the code column is
/// treated as a collision.
pub struct LinkService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(repository: Arc<L>) -> Self {
        Self { repository }
    }

    /// Creates a short link.
    ///
    /// # Code Allocation
    ///
    /// - With `desired_code`: validated, then inserted once. A taken code fails
    ///   with [`AppError::CodeConflict`]; there is no retry.
    /// - Without: random candidates of length 6, then 7, then 8, up to
    ///   [`ATTEMPTS_PER_LENGTH`] per length. Collisions move on to the next
    ///   candidate; any other store failure is returned immediately.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidTarget`] if the URL cannot be normalized
    /// - [`AppError::Validation`] if `desired_code` is malformed or reserved
    /// - [`AppError::CodeConflict`] if `desired_code` is taken
    /// - [`AppError::CodeSpaceExhausted`] if every generated candidate collided
    /// - [`AppError::Store`] on other store failures
    pub async fn create_link(
        &self,
        target_url: &str,
        desired_code: Option<&str>,
        owner_id: Option<String>,
    ) -> Result<Link, AppError> {
        let target_url = normalize_target(target_url).map_err(|e| AppError::InvalidTarget {
            reason: e.to_string(),
        })?;

        if let Some(code) = desired_code {
            validate_custom_code(code)?;

            let new_link = NewLink {
                code: code.to_string(),
                target_url,
                owner_id,
            };

            return match self.repository.insert(new_link).await {
                Ok(link) => {
                    metrics::counter!("links_created_total", "code" => "custom").increment(1);
                    tracing::info!(code = %link.code, link_id = link.id, "Link created");
                    Ok(link)
                }
                Err(e) if e.is_code_collision() => Err(AppError::CodeConflict {
                    code: code.to_string(),
                }),
                Err(e) => Err(e.into()),
            };
        }

        self.insert_with_generated_code(target_url, owner_id).await
    }

    async fn insert_with_generated_code(
        &self,
        target_url: String,
        owner_id: Option<String>,
    ) -> Result<Link, AppError> {
        let mut attempts = 0;

        for length in MIN_CODE_LENGTH..=MAX_CODE_LENGTH {
            for _ in 0..ATTEMPTS_PER_LENGTH {
                attempts += 1;

                let new_link = NewLink {
                    code: generate_code(length),
                    target_url: target_url.clone(),
                    owner_id: owner_id.clone(),
                };

                match self.repository.insert(new_link).await {
                    Ok(link) => {
                        metrics::counter!("links_created_total", "code" => "generated")
                            .increment(1);
                        tracing::info!(
                            code = %link.code,
                            link_id = link.id,
                            attempts,
                            "Link created"
                        );
                        return Ok(link);
                    }
                    Err(e) if e.is_code_collision() => {
                        metrics::counter!("code_collisions_total").increment(1);
                        tracing::debug!(length, attempts, "Generated code collided, retrying");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        tracing::warn!(attempts, "Code space exhausted");
        Err(AppError::CodeSpaceExhausted { attempts })
    }

    /// Finds a link by code.
    ///
    /// Links flagged as deleted are only returned when `include_deleted` is set.
    pub async fn find_by_code(
        &self,
        code: &str,
        include_deleted: bool,
    ) -> Result<Option<Link>, AppError> {
        let link = self.repository.find_by_code(code).await?;
        Ok(link.filter(|l| include_deleted || l.is_active()))
    }

    /// Retrieves an active link by code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active link has this code.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.find_by_code(code, false)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "code": code })))
    }

    /// Finds all active links among `codes`. Unknown codes are skipped.
    pub async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<Link>, AppError> {
        Ok(self.repository.find_by_codes(codes).await?)
    }

    /// Lists active links, newest first.
    ///
    /// `search` matches case-insensitively against code and target URL.
    /// `limit` is clamped to `0..=500` and a negative `offset` is treated as 0.
    pub async fn list_links(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Link>, AppError> {
        let query = LinkQuery {
            search: search.filter(|s| !s.trim().is_empty()),
            limit: limit.clamp(0, MAX_LIST_LIMIT),
            offset: offset.max(0),
        };

        Ok(self.repository.list(query).await?)
    }

    /// Deletes a link together with its clicks.
    ///
    /// Returns `false` if no link has this code.
    pub async fn delete_by_code(&self, code: &str) -> Result<bool, AppError> {
        let deleted = self.repository.delete_by_code(code).await?;
        if deleted {
            tracing::info!(code, "Link deleted");
        }
        Ok(deleted)
    }

    /// Round-trips to the store.
    pub async fn ping(&self) -> Result<(), AppError> {
        Ok(self.repository.ping().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockLinkRepository, StoreError};
    use crate::utils::code_generator::is_valid_code;
    use chrono::Utc;
    use std::sync::Mutex;

    fn link_from(new_link: &NewLink, id: i64) -> Link {
        Link::new(
            id,
            new_link.code.clone(),
            new_link.target_url.clone(),
            new_link.owner_id.clone(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_create_link_generates_six_char_code() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_insert()
            .withf(|new_link| {
                new_link.code.len() == 6
                    && is_valid_code(&new_link.code)
                    && new_link.target_url == "https://example.com/a"
            })
            .times(1)
            .returning(|new_link| Ok(link_from(&new_link, 1)));

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service
            .create_link("example.com/a", None, None)
            .await
            .unwrap();

        assert_eq!(link.code.len(), 6);
        assert_eq!(link.target_url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_create_link_invalid_target() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_insert().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service.create_link("ftp://x", None, None).await;

        assert!(matches!(result, Err(AppError::InvalidTarget { .. })));
    }

    #[tokio::test]
    async fn test_create_link_with_desired_code() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_insert()
            .withf(|new_link| {
                new_link.code == "promo42" && new_link.owner_id.as_deref() == Some("user-1")
            })
            .times(1)
            .returning(|new_link| Ok(link_from(&new_link, 3)));

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service
            .create_link(
                "https://example.com",
                Some("promo42"),
                Some("user-1".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(link.code, "promo42");
    }

    #[tokio::test]
    async fn test_create_link_desired_code_conflict_does_not_retry() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::code_collision()));

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service
            .create_link("https://example.com", Some("taken12"), None)
            .await;

        match result {
            Err(AppError::CodeConflict { code }) => assert_eq!(code, "taken12"),
            other => panic!("expected CodeConflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_link_rejects_malformed_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_insert().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        for code in ["abc", "abcdefghi", "bad-cd", "summary"] {
            let result = service
                .create_link("https://example.com", Some(code), None)
                .await;
            assert!(
                matches!(result, Err(AppError::Validation { .. })),
                "code {code} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_link_retries_collisions_and_escalates_length() {
        let mut mock_repo = MockLinkRepository::new();
        let lengths = Arc::new(Mutex::new(Vec::new()));
        let seen = lengths.clone();

        mock_repo.expect_insert().times(6).returning(move |new_link| {
            let mut seen = seen.lock().unwrap();
            seen.push(new_link.code.len());
            if seen.len() <= 5 {
                Err(StoreError::code_collision())
            } else {
                Ok(link_from(&new_link, 9))
            }
        });

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service
            .create_link("https://example.com", None, None)
            .await
            .unwrap();

        assert_eq!(link.code.len(), 7);
        assert_eq!(*lengths.lock().unwrap(), vec![6, 6, 6, 6, 6, 7]);
    }

    #[tokio::test]
    async fn test_create_link_exhausts_code_space() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_insert()
            .times(15)
            .returning(|_| Err(StoreError::code_collision()));

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service.create_link("https://example.com", None, None).await;

        match result {
            Err(AppError::CodeSpaceExhausted { attempts }) => assert_eq!(attempts, 15),
            other => panic!("expected CodeSpaceExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_link_propagates_other_store_errors() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::Timeout));

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service.create_link("https://example.com", None, None).await;

        assert!(matches!(result, Err(AppError::Store(StoreError::Timeout))));
    }

    #[tokio::test]
    async fn test_unrelated_unique_violation_is_not_a_collision() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo.expect_insert().times(1).returning(|_| {
            Err(StoreError::UniqueViolation {
                constraint: Some("links_pkey".to_string()),
            })
        });

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service.create_link("https://example.com", None, None).await;

        assert!(matches!(
            result,
            Err(AppError::Store(StoreError::UniqueViolation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_find_by_code_hides_deleted_unless_requested() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo.expect_find_by_code().times(2).returning(|code| {
            let mut link = Link::new(
                5,
                code.to_string(),
                "https://example.com/".to_string(),
                None,
                Utc::now(),
            );
            link.is_deleted = true;
            Ok(Some(link))
        });

        let service = LinkService::new(Arc::new(mock_repo));

        assert!(service.find_by_code("gone00", false).await.unwrap().is_none());
        assert!(service.find_by_code("gone00", true).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service.get_link("nope00").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_links_clamps_limit() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_list()
            .withf(|q| q.limit == MAX_LIST_LIMIT && q.offset == 0 && q.search.is_none())
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = LinkService::new(Arc::new(mock_repo));

        let links = service
            .list_links(Some("  ".to_string()), 10_000, -5)
            .await
            .unwrap();

        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_code_reports_absence() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_delete_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(false));

        let service = LinkService::new(Arc::new(mock_repo));

        assert!(!service.delete_by_code("abc123").await.unwrap());
    }
}
