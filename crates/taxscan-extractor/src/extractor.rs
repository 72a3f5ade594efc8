//! Core Extractor implementation
//!
//! One call moves through:
//!
//! ```text
//! Idle -> RequestSent -> EmptyResponse -> RequestSent (retry, max 1) -> ...
//!                     -> ResponseReceived -> ParseOK -> Done
//!                                         -> ParseFailed -> Failed
//! ```
//!
//! Any provider fault goes straight to `Failed` with a classified reason.

use crate::classify::classify;
use crate::config::ExtractorConfig;
use crate::error::{ErrorKind, ExtractionError};
use crate::parser::parse_provider_response;
use crate::prompt::{response_schema, EXTRACTION_INSTRUCTIONS};
use crate::types::{ExtractionMetadata, ExtractionRequest, ExtractionResult};
use std::sync::Arc;
use std::time::Instant;
use taxscan_domain::traits::{DocumentProvider, ProviderRequest, SafetySetting};
use taxscan_domain::{select_tier, Transaction};
use tracing::{debug, info, warn};

/// Extra provider calls allowed after an empty response
pub const MAX_EMPTY_RETRIES: u32 = 1;

/// The Extractor turns a statement document into transactions
///
/// Holds no per-call state; one instance can serve concurrent calls.
pub struct Extractor<P>
where
    P: DocumentProvider,
{
    provider: Arc<P>,
    config: ExtractorConfig,
}

impl<P> Extractor<P>
where
    P: DocumentProvider,
{
    /// Create a new Extractor
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self::with_shared_provider(Arc::new(provider), config)
    }

    /// Create a new Extractor around a provider that is shared elsewhere
    pub fn with_shared_provider(provider: Arc<P>, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract transactions from a statement
    ///
    /// Returns an empty vector when the provider found nothing, even after
    /// the empty-response retry.
    pub async fn extract(&self, request: ExtractionRequest) -> Result<Vec<Transaction>, ExtractionError> {
        self.extract_detailed(request).await.map(|result| result.transactions)
    }

    /// Extract transactions and report how the call went
    pub async fn extract_detailed(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractionError> {
        let start_time = Instant::now();

        if !self.provider.is_configured() {
            warn!("Extraction refused: provider has no credential");
            return Err(ExtractionError::new(ErrorKind::Configuration));
        }

        let decoded_size_bytes = request.document.decoded_size();
        let tier = select_tier(
            decoded_size_bytes,
            request.preference,
            self.config.deep_threshold_bytes,
        );
        let model = self.config.model_for(tier).to_string();

        info!(
            "Starting extraction: {} bytes ({}), requested {:?}, using {} tier ({})",
            decoded_size_bytes,
            request.document.mime_type(),
            request.preference,
            tier,
            model
        );

        let provider_request = ProviderRequest {
            model: model.clone(),
            document: request.document,
            instructions: EXTRACTION_INSTRUCTIONS.to_string(),
            response_schema: response_schema(),
            safety: if self.config.disable_safety_filters {
                SafetySetting::BlockNone
            } else {
                SafetySetting::ProviderDefault
            },
        };

        let mut attempts = 0;
        let response = loop {
            attempts += 1;
            debug!("Sending request (attempt {})", attempts);

            match self.provider.extract_document(&provider_request).await {
                Ok(Some(text)) if !text.trim().is_empty() => break Some(text),
                Ok(_) if attempts <= MAX_EMPTY_RETRIES => {
                    warn!("Provider returned an empty response; retrying once");
                }
                Ok(_) => break None,
                Err(e) => {
                    let raw = e.to_string();
                    let kind = classify(&raw);
                    debug!("Provider error: {}", raw);
                    warn!("Extraction failed on {} tier: {:?}", tier, kind);
                    return Err(ExtractionError::with_tier(kind, tier));
                }
            }
        };

        let (transactions, repaired, skipped_items) = match response {
            None => {
                info!("Provider returned no content after retry; treating as no transactions");
                (Vec::new(), false, 0)
            }
            Some(text) => {
                debug!("Response length: {} chars", text.len());
                let parsed = parse_provider_response(&text).map_err(|e| {
                    warn!("Response could not be parsed: {}", e);
                    ExtractionError::with_tier(ErrorKind::DataFormat, tier)
                })?;
                (parsed.transactions, parsed.repaired, parsed.skipped)
            }
        };

        let processing_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Extraction complete: {} transactions, {} skipped, {} attempt(s), {} ms",
            transactions.len(),
            skipped_items,
            attempts,
            processing_time_ms
        );

        Ok(ExtractionResult {
            transactions,
            metadata: ExtractionMetadata {
                tier,
                model,
                decoded_size_bytes,
                attempts,
                repaired,
                skipped_items,
                processing_time_ms,
            },
        })
    }
}
