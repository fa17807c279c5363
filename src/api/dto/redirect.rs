//! DTO for the redirect endpoint.

use serde::Serialize;

/// Target of a resolved short code. The client performs the navigation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectResponse {
    pub target_url: String,
}
