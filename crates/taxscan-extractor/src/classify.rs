//! Map provider error text onto the fixed failure taxonomy
//!
//! Providers report failures as free text (status codes, API status names,
//! prose). Matching is a case-insensitive substring search over an ordered
//! rule list; the first rule that matches wins. Order matters: `429` must win
//! over anything else in the same message, and the generic `500`/`internal`
//! rules come last.
//!
//! Apart from `429`, status codes only match in the `HTTP <status>` form that
//! `ProviderError::Api` emits. Token counts and byte sizes in the provider's
//! own text often contain the same digits.

use crate::error::ErrorKind;

/// Ordered `(substring, kind)` rules. Substrings are lowercase.
pub const CLASSIFICATION_RULES: &[(&str, ErrorKind)] = &[
    // Throttling
    ("429", ErrorKind::RateLimited),
    ("resource_exhausted", ErrorKind::RateLimited),
    ("quota", ErrorKind::RateLimited),
    ("rate limit", ErrorKind::RateLimited),
    ("too many requests", ErrorKind::RateLimited),
    ("http 503", ErrorKind::RateLimited),
    ("overloaded", ErrorKind::RateLimited),
    // Credentials
    ("missing api key", ErrorKind::Configuration),
    ("http 401", ErrorKind::AccessDenied),
    ("http 403", ErrorKind::AccessDenied),
    ("api key not valid", ErrorKind::AccessDenied),
    ("api_key_invalid", ErrorKind::AccessDenied),
    ("permission_denied", ErrorKind::AccessDenied),
    ("permission denied", ErrorKind::AccessDenied),
    ("unauthenticated", ErrorKind::AccessDenied),
    // Transport size
    ("http 413", ErrorKind::PayloadTooLarge),
    ("payload too large", ErrorKind::PayloadTooLarge),
    ("entity too large", ErrorKind::PayloadTooLarge),
    ("request payload size", ErrorKind::PayloadTooLarge),
    // Model lookup
    ("http 404", ErrorKind::ModelUnavailable),
    ("not_found", ErrorKind::ModelUnavailable),
    ("not found", ErrorKind::ModelUnavailable),
    // Safety
    ("safety", ErrorKind::ContentBlocked),
    ("blocked", ErrorKind::ContentBlocked),
    ("recitation", ErrorKind::ContentBlocked),
    ("prohibited_content", ErrorKind::ContentBlocked),
    // Context limits
    ("token", ErrorKind::ContentTooDense),
    ("context length", ErrorKind::ContentTooDense),
    ("context window", ErrorKind::ContentTooDense),
    // Provider-side processing failure
    ("http 500", ErrorKind::UnsupportedComplexity),
    ("internal", ErrorKind::UnsupportedComplexity),
    ("unable to process", ErrorKind::UnsupportedComplexity),
];

/// Classify a provider error message
///
/// # Examples
///
/// ```
/// use taxscan_extractor::{classify, ErrorKind};
///
/// assert_eq!(classify("HTTP 429: Too Many Requests"), ErrorKind::RateLimited);
/// assert_eq!(classify("connection reset by peer"), ErrorKind::Unknown);
/// ```
pub fn classify(message: &str) -> ErrorKind {
    let haystack = message.to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|(needle, _)| haystack.contains(needle))
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_are_lowercase() {
        for (needle, _) in CLASSIFICATION_RULES {
            assert_eq!(*needle, needle.to_lowercase());
        }
    }

    #[test]
    fn test_429_wins_regardless_of_context() {
        assert_eq!(classify("429"), ErrorKind::RateLimited);
        assert_eq!(classify("Error 429 - internal token budget"), ErrorKind::RateLimited);
        assert_eq!(classify("HTTP 429: RESOURCE_EXHAUSTED: Quota exceeded"), ErrorKind::RateLimited);
        assert_eq!(classify("got status=429 from upstream (not found?)"), ErrorKind::RateLimited);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("API KEY NOT VALID. Please pass a valid API key."), ErrorKind::AccessDenied);
        assert_eq!(classify("Rate Limit hit"), ErrorKind::RateLimited);
    }

    #[test]
    fn test_access_denied() {
        assert_eq!(classify("HTTP 403: PERMISSION_DENIED: caller lacks access"), ErrorKind::AccessDenied);
        assert_eq!(classify("HTTP 401: UNAUTHENTICATED"), ErrorKind::AccessDenied);
        assert_eq!(classify("HTTP 400: INVALID_ARGUMENT: API_KEY_INVALID"), ErrorKind::AccessDenied);
    }

    #[test]
    fn test_model_unavailable() {
        assert_eq!(
            classify("HTTP 404: NOT_FOUND: models/gemini-9 is not found for API version v1beta"),
            ErrorKind::ModelUnavailable
        );
    }

    #[test]
    fn test_payload_too_large() {
        assert_eq!(classify("HTTP 413: Request Entity Too Large"), ErrorKind::PayloadTooLarge);
        assert_eq!(
            classify("HTTP 400: INVALID_ARGUMENT: Request payload size exceeds the limit: 20971520 bytes."),
            ErrorKind::PayloadTooLarge
        );
    }

    #[test]
    fn test_content_too_dense() {
        assert_eq!(
            classify("HTTP 400: INVALID_ARGUMENT: The input token count (1200000) exceeds the maximum"),
            ErrorKind::ContentTooDense
        );
        assert_eq!(classify("context length exceeded"), ErrorKind::ContentTooDense);
    }

    #[test]
    fn test_unsupported_complexity() {
        assert_eq!(classify("HTTP 500: INTERNAL: An internal error has occurred"), ErrorKind::UnsupportedComplexity);
        assert_eq!(classify("Model was unable to process the document"), ErrorKind::UnsupportedComplexity);
    }

    #[test]
    fn test_content_blocked() {
        assert_eq!(classify("Blocked by safety filter: SAFETY"), ErrorKind::ContentBlocked);
        assert_eq!(classify("Blocked by safety filter: RECITATION"), ErrorKind::ContentBlocked);
    }

    #[test]
    fn test_missing_credential() {
        assert_eq!(classify("Missing API key"), ErrorKind::Configuration);
    }

    #[test]
    fn test_status_digits_inside_counts_ignored() {
        assert_eq!(
            classify("HTTP 400: INVALID_ARGUMENT: The input token count (1503112) exceeds the maximum number of tokens allowed (1048576)."),
            ErrorKind::ContentTooDense
        );
        assert_eq!(
            classify("HTTP 400: INVALID_ARGUMENT: Request payload size exceeds the limit: 4013500 bytes."),
            ErrorKind::PayloadTooLarge
        );
        assert_eq!(classify("HTTP 400: page 1404 of 2401 unreadable"), ErrorKind::Unknown);
    }

    #[test]
    fn test_status_rules_need_http_prefix() {
        assert_eq!(classify("HTTP 503: UNAVAILABLE"), ErrorKind::RateLimited);
        assert_eq!(classify("Provider error: HTTP 404: gone"), ErrorKind::ModelUnavailable);
        assert_eq!(classify("HTTP 413"), ErrorKind::PayloadTooLarge);
        assert_eq!(classify("HTTP 401"), ErrorKind::AccessDenied);
        assert_eq!(classify("HTTP 500"), ErrorKind::UnsupportedComplexity);
    }

    #[test]
    fn test_unknown_fallback() {
        assert_eq!(classify(""), ErrorKind::Unknown);
        assert_eq!(classify("Communication error: Request failed: connection refused"), ErrorKind::Unknown);
    }
}
