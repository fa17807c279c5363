//! DTOs for windowed analytics endpoints.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

/// Window used by the per-link summary when `days` is omitted.
pub const DEFAULT_SUMMARY_DAYS: u32 = 30;

/// Window used by the batch summary when `days` is omitted.
pub const DEFAULT_BATCH_DAYS: u32 = 7;

/// Query parameters of the per-link summary endpoints.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub days: Option<u32>,
}

/// Request body of `POST /api/links/summary`.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchSummaryRequest {
    #[validate(length(min = 1, max = 500, message = "codes must contain 1-500 entries"))]
    #[serde(default)]
    pub codes: Vec<String>,

    pub days: Option<u32>,
}
