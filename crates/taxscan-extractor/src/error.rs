//! Error types for the Extractor

use taxscan_domain::Tier;
use thiserror::Error;

/// User-facing failure categories
///
/// Every provider or parse failure is reported as exactly one of these, with a
/// fixed message. Raw provider text is never part of the message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No provider credential configured
    #[error("The extraction service is not configured: no API key was provided.")]
    Configuration,

    /// Authentication or permission failure
    #[error("Access was denied by the extraction service. Check that your API key is valid and enabled for this model.")]
    AccessDenied,

    /// Requested backend model does not exist
    #[error("The selected extraction model is unavailable. Try switching to the other processing tier.")]
    ModelUnavailable,

    /// Quota or throttling
    #[error("The extraction service is busy or your quota is exhausted. Wait a moment and try again.")]
    RateLimited,

    /// Transport size limit exceeded
    #[error("The document is too large for the extraction service. Compress it or split it into smaller files.")]
    PayloadTooLarge,

    /// Token or context-window limit reached
    #[error("The document has too much content for this model. Use the deep tier or split the statement into parts.")]
    ContentTooDense,

    /// Provider failed internally while processing the document
    #[error("The extraction service could not process this document. Try converting it to an image or simplifying it.")]
    UnsupportedComplexity,

    /// Rejected by the provider's safety filter
    #[error("The document was rejected by the provider's content filter. Try a different file.")]
    ContentBlocked,

    /// Response could not be parsed even after repair
    #[error("No transactions could be read from the response. The document is likely illegible.")]
    DataFormat,

    /// Nothing matched
    #[error("Failed to process the document. Please try again or contact support.")]
    Unknown,
}

impl ErrorKind {
    /// Whether resubmitting the same document unchanged may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::RateLimited | ErrorKind::Unknown)
    }
}

/// A classified extraction failure
///
/// Displays the kind's fixed message, prefixed with `[Deep] ` when the deep
/// tier produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}{kind}", tier_tag(.tier))]
pub struct ExtractionError {
    kind: ErrorKind,
    tier: Option<Tier>,
}

impl ExtractionError {
    /// Create an error raised before or without a tier selection
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, tier: None }
    }

    /// Create an error raised while using `tier`
    pub fn with_tier(kind: ErrorKind, tier: Tier) -> Self {
        Self { kind, tier: Some(tier) }
    }

    /// Failure category
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Tier in use when the failure happened, if one had been selected
    pub fn tier(&self) -> Option<Tier> {
        self.tier
    }
}

impl From<ErrorKind> for ExtractionError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

fn tier_tag(tier: &Option<Tier>) -> &'static str {
    match tier {
        Some(Tier::Deep) => "[Deep] ",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_tier_message_untagged() {
        let err = ExtractionError::with_tier(ErrorKind::RateLimited, Tier::Fast);
        assert_eq!(err.to_string(), ErrorKind::RateLimited.to_string());
    }

    #[test]
    fn test_deep_tier_message_tagged() {
        let err = ExtractionError::with_tier(ErrorKind::DataFormat, Tier::Deep);
        assert!(err.to_string().starts_with("[Deep] "));
        assert!(err.to_string().ends_with(&ErrorKind::DataFormat.to_string()));
    }

    #[test]
    fn test_configuration_has_no_tier() {
        let err: ExtractionError = ErrorKind::Configuration.into();
        assert_eq!(err.tier(), None);
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!err.kind().is_retryable());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::RateLimited.is_retryable());
        assert!(!ErrorKind::ContentBlocked.is_retryable());
        assert!(!ErrorKind::DataFormat.is_retryable());
    }
}
