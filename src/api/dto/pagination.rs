//! Listing query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::link_service::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

/// Query parameters of `GET /api/links`.
///
/// Uses `serde_with` to parse numbers from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksParams {
    /// Case-insensitive substring of code or target URL.
    #[serde(default)]
    pub q: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ListLinksParams {
    /// Validates paging and converts to `(limit, offset)`.
    ///
    /// # Defaults
    ///
    /// - `limit`: 100, capped at 500
    /// - `offset`: 0
    ///
    /// # Validation
    ///
    /// - Limit must be > 0
    /// - Offset must be >= 0
    pub fn validate_and_get_limit_offset(&self) -> Result<(i64, i64), String> {
        let limit = self.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let offset = self.offset.unwrap_or(0);

        if limit <= 0 {
            return Err("Limit must be greater than 0".to_string());
        }

        if offset < 0 {
            return Err("Offset must not be negative".to_string());
        }

        Ok((limit.min(MAX_LIST_LIMIT), offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>) -> ListLinksParams {
        ListLinksParams {
            q: None,
            limit,
            offset,
        }
    }

    #[test]
    fn test_defaults() {
        let (limit, offset) = params(None, None).validate_and_get_limit_offset().unwrap();
        assert_eq!(limit, 100);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_limit_capped() {
        let (limit, _) = params(Some(5000), None)
            .validate_and_get_limit_offset()
            .unwrap();
        assert_eq!(limit, 500);
    }

    #[test]
    fn test_zero_limit_is_error() {
        assert!(params(Some(0), None).validate_and_get_limit_offset().is_err());
    }

    #[test]
    fn test_negative_offset_is_error() {
        assert!(params(None, Some(-1)).validate_and_get_limit_offset().is_err());
    }
}
