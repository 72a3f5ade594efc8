//! taxscan Domain Layer
//!
//! This crate contains the core value types and pure business logic for taxscan.
//! It defines the fundamental concepts and the trait interface that the
//! infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Transaction**: One dated CREDIT or DEBIT line read off a bank statement
//! - **Tax Engine**: Consolidated relief followed by graduated marginal bands
//! - **Tier**: Fast or deep extraction backend, chosen by size or preference
//! - **Document Payload**: A base64 statement file plus its declared MIME type
//! - **Statement Session**: The in-memory transaction set for the current upload
//!
//! ## Architecture
//!
//! - No I/O and no network access
//! - Pure business logic only
//! - Provider implementations live in `taxscan-llm`
//! - The extraction pipeline lives in `taxscan-extractor`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod session;
pub mod tax;
pub mod tier;
pub mod traits;
pub mod transaction;

// Re-exports for convenience
pub use document::{DocumentPayload, MimeType};
pub use session::StatementSession;
pub use tax::{compute_tax, BandCharge, TaxBreakdown};
pub use tier::{select_tier, ProviderChoice, Tier, DEFAULT_DEEP_THRESHOLD_BYTES};
pub use transaction::{StatementTotals, Transaction, TransactionType};
