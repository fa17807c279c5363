//! Short code generation and validation utilities.
//!
//! Codes are drawn uniformly from the 62-symbol alphanumeric alphabet using the
//! thread-local CSPRNG, so upcoming codes cannot be predicted from observed ones.
//! Uniqueness is not guaranteed here; the link service retries on collisions
//! reported by the store.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Shortest code, and the length generation starts at.
pub const MIN_CODE_LENGTH: usize = 6;

/// Longest code, and the length generation escalates to.
pub const MAX_CODE_LENGTH: usize = 8;

/// Candidates tried at each length before moving to the next one.
pub const ATTEMPTS_PER_LENGTH: usize = 5;

/// Codes that would shadow fixed API paths.
pub const RESERVED_CODES: &[&str] = &["summary", "healthz"];

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{6,8}$").expect("valid code regex"));

/// Generates a random code of `length` characters from `[A-Za-z0-9]`.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Returns true if `code` has the shape of a short code (6–8 alphanumerics).
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Returns true if `code` collides with a fixed route segment.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}

/// Validates a caller-chosen short code.
///
/// # Rules
///
/// - Length: 6-8 characters
/// - Allowed characters: ASCII letters and digits
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !is_valid_code(code) {
        return Err(AppError::bad_request(
            "Code must be 6-8 letters or digits",
            json!({ "code": code }),
        ));
    }

    if is_reserved(code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_requested_length() {
        for len in MIN_CODE_LENGTH..=MAX_CODE_LENGTH {
            assert_eq!(generate_code(len).len(), len);
        }
    }

    #[test]
    fn test_generate_code_alphanumeric_only() {
        for _ in 0..200 {
            let code = generate_code(8);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()), "{code}");
        }
    }

    #[test]
    fn test_generated_codes_pass_validation() {
        for _ in 0..200 {
            assert!(is_valid_code(&generate_code(MIN_CODE_LENGTH)));
        }
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code(8)).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generate_code_uses_whole_alphabet() {
        let mut upper = false;
        let mut lower = false;
        let mut digit = false;

        for c in (0..200).flat_map(|_| generate_code(8).into_bytes()) {
            upper |= c.is_ascii_uppercase();
            lower |= c.is_ascii_lowercase();
            digit |= c.is_ascii_digit();
        }

        assert!(upper && lower && digit);
    }

    #[test]
    fn test_validate_boundaries() {
        assert!(validate_custom_code("abc123").is_ok());
        assert!(validate_custom_code("ABCdef12").is_ok());
        assert!(validate_custom_code("abc12").is_err());
        assert!(validate_custom_code("abcdef123").is_err());
    }

    #[test]
    fn test_validate_rejects_symbols() {
        assert!(validate_custom_code("my-code").is_err());
        assert!(validate_custom_code("my_code1").is_err());
        assert!(validate_custom_code("my code").is_err());
        assert!(validate_custom_code("").is_err());
    }

    #[test]
    fn test_validate_rejects_non_ascii() {
        assert!(validate_custom_code("caf\u{e9}123").is_err());
    }

    #[test]
    fn test_validate_reserved_codes() {
        for &reserved in RESERVED_CODES {
            let result = validate_custom_code(reserved);
            assert!(result.is_err(), "Reserved code '{}' should be invalid", reserved);
        }
        assert!(validate_custom_code("Summary").is_err());
    }

    #[test]
    fn test_validate_error_message() {
        let err = validate_custom_code("x").unwrap_err();
        assert!(err.to_string().contains("6-8"));
    }
}
