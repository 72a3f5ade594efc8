//! Error types for the CLI application.

use taxscan_extractor::{ErrorKind, ExtractionError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction failed; the message is already user-facing
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Line editor failure in REPL mode
    #[error("Editor error: {0}")]
    Editor(String),

    /// REPL command needs a loaded statement
    #[error("No statement loaded. Use 'load <file>' first.")]
    NotLoaded,
}

impl CliError {
    /// Follow-up advice printed under the error message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Extraction(e) if e.kind() == ErrorKind::Configuration => {
                Some("Set GEMINI_API_KEY or run `taxscan config set-key <KEY>`.")
            }
            CliError::Extraction(e) if e.kind().is_retryable() => {
                Some("This is usually temporary; it is safe to try again.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxscan_domain::Tier;

    #[test]
    fn test_configuration_hint() {
        let err = CliError::from(ExtractionError::new(ErrorKind::Configuration));
        assert!(err.hint().unwrap().contains("set-key"));
    }

    #[test]
    fn test_retryable_kinds_get_retry_hint() {
        for kind in [ErrorKind::RateLimited, ErrorKind::Unknown] {
            let err = CliError::from(ExtractionError::with_tier(kind, Tier::Deep));
            assert!(err.hint().unwrap().contains("try again"), "{:?}", kind);
        }
    }

    #[test]
    fn test_terminal_kinds_have_no_hint() {
        let err = CliError::from(ExtractionError::with_tier(ErrorKind::DataFormat, Tier::Fast));
        assert_eq!(err.hint(), None);
        assert_eq!(CliError::NotLoaded.hint(), None);
    }

    #[test]
    fn test_extraction_message_passes_through() {
        let err = CliError::from(ExtractionError::with_tier(ErrorKind::RateLimited, Tier::Deep));
        assert!(err.to_string().starts_with("[Deep] "));
    }
}
