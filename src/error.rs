//! Application error type and its HTTP representation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by the link, click and analytics services.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request payload or parameters failed validation.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Target URL could not be parsed, even with an `https://` prefix.
    #[error("Invalid target URL: {reason}")]
    InvalidTarget { reason: String },

    /// An explicitly requested short code is already taken.
    #[error("Short code '{code}' already exists")]
    CodeConflict { code: String },

    /// No free code was found within the candidate budget.
    #[error("Unable to allocate a unique short code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error is surfaced with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidTarget { .. } => StatusCode::BAD_REQUEST,
            AppError::CodeConflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::CodeSpaceExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(e) if e.is_transient() => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into the payload sent to clients.
    ///
    /// Store failures are reduced to a generic message; their details are only logged.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::InvalidTarget { reason } => ErrorInfo {
                code: "invalid_target",
                message: "Invalid URL".to_string(),
                details: json!({ "reason": reason }),
            },
            AppError::CodeConflict { code } => ErrorInfo {
                code: "code_conflict",
                message: "Code already exists".to_string(),
                details: json!({ "code": code }),
            },
            AppError::CodeSpaceExhausted { attempts } => ErrorInfo {
                code: "code_space_exhausted",
                message: "Unable to generate unique code, try again".to_string(),
                details: json!({ "attempts": attempts }),
            },
            AppError::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Store(e) if e.is_transient() => ErrorInfo {
                code: "store_unavailable",
                message: "Storage temporarily unavailable".to_string(),
                details: json!({}),
            },
            AppError::Store(_) => ErrorInfo {
                code: "internal_error",
                message: "Database error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Invalid payload", details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::InvalidTarget {
                reason: "x".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::CodeConflict {
                code: "abc123".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::CodeSpaceExhausted { attempts: 15 }.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::not_found("gone", json!({})).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Store(StoreError::Timeout).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Store(StoreError::Query("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_details_are_not_exposed() {
        let info = AppError::Store(StoreError::Query("relation links missing".to_string()))
            .to_error_info();

        assert_eq!(info.code, "internal_error");
        assert!(!info.message.contains("relation"));
        assert_eq!(info.details, json!({}));
    }

    #[test]
    fn test_conflict_info_names_code() {
        let info = AppError::CodeConflict {
            code: "taken1".to_string(),
        }
        .to_error_info();

        assert_eq!(info.code, "code_conflict");
        assert_eq!(info.details["code"], "taken1");
    }

    #[test]
    fn test_store_error_converts() {
        let err: AppError = StoreError::MissingLink.into();
        assert!(matches!(err, AppError::Store(StoreError::MissingLink)));
    }
}
