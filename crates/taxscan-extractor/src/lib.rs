//! taxscan Extractor
//!
//! Converts a bank statement document into a typed transaction list using an
//! external document-understanding provider.
//!
//! # Overview
//!
//! The provider is a generative model: its output is treated as untrusted
//! text. Every response goes through code-fence stripping, truncation repair
//! and validation before any `Transaction` is produced, and every provider
//! failure is reported as one `ErrorKind` with a fixed message.
//!
//! # Architecture
//!
//! ```text
//! Document → tier selection → Provider → repair/parse → Vec<Transaction>
//!                                  ↘ error text → classify → ExtractionError
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use taxscan_extractor::{Extractor, ExtractorConfig, ExtractionRequest};
//! use taxscan_domain::{compute_tax, MimeType, ProviderChoice, StatementTotals};
//! use taxscan_llm::GeminiProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::new(GeminiProvider::from_env(), ExtractorConfig::default());
//!
//! let request = ExtractionRequest::from_data_uri(
//!     "data:application/pdf;base64,JVBERi0xLjcK...",
//!     MimeType::Pdf,
//!     ProviderChoice::Fast,
//! );
//!
//! let transactions = extractor.extract(request).await?;
//! let totals = StatementTotals::from_transactions(&transactions);
//! let tax = compute_tax(totals.credits);
//!
//! println!("{} transactions, tax due {}", transactions.len(), tax.total_tax);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod classify;
mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod types;

pub use classify::{classify, CLASSIFICATION_RULES};
pub use config::{ExtractorConfig, DEFAULT_DEEP_MODEL, DEFAULT_FAST_MODEL};
pub use error::{ErrorKind, ExtractionError};
pub use extractor::{Extractor, MAX_EMPTY_RETRIES};
pub use parser::{parse_provider_response, ParseError, ParsedResponse, MAX_TRANSACTION_AMOUNT};
pub use prompt::{response_schema, EXTRACTION_INSTRUCTIONS};
pub use types::{ExtractionMetadata, ExtractionRequest, ExtractionResult};
