//! Request and response types for extraction

use taxscan_domain::{DocumentPayload, MimeType, ProviderChoice, Tier, Transaction};

/// Request to extract transactions from one statement
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// The statement document
    pub document: DocumentPayload,

    /// Tier requested by the caller; may be escalated by size
    pub preference: ProviderChoice,
}

impl ExtractionRequest {
    /// Create a request for an already-wrapped document
    pub fn new(document: DocumentPayload, preference: ProviderChoice) -> Self {
        Self { document, preference }
    }

    /// Create a request from a data-URI-style base64 payload
    pub fn from_data_uri(encoded: &str, mime_type: MimeType, preference: ProviderChoice) -> Self {
        Self::new(DocumentPayload::from_data_uri(encoded, mime_type), preference)
    }
}

/// Result of an extraction operation
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Transactions in document order; empty when none were found
    pub transactions: Vec<Transaction>,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMetadata {
    /// Tier actually used
    pub tier: Tier,

    /// Backend model identifier used
    pub model: String,

    /// Estimated decoded document size
    pub decoded_size_bytes: u64,

    /// Provider calls made (1, or 2 after an empty response)
    pub attempts: u32,

    /// Whether the response was truncated and repaired
    pub repaired: bool,

    /// Response items dropped as invalid transactions
    pub skipped_items: usize,

    /// Wall-clock time for the whole call
    pub processing_time_ms: u64,
}
