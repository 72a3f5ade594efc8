//! Trait definitions for external interactions
//!
//! These traits define the boundary between the extraction pipeline and the
//! document-understanding backends. Implementations live in `taxscan-llm`.

use crate::DocumentPayload;
use async_trait::async_trait;

/// Content-safety filtering requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafetySetting {
    /// Do not block any harm category. Bank statements routinely trip
    /// filters on names and amounts.
    #[default]
    BlockNone,

    /// Leave the provider's defaults in place
    ProviderDefault,
}

/// One extraction request as seen by a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Backend model identifier
    pub model: String,

    /// The statement document
    pub document: DocumentPayload,

    /// Natural-language instructions sent alongside the document
    pub instructions: String,

    /// JSON schema the response must conform to
    pub response_schema: String,

    /// Safety-filter configuration
    pub safety: SafetySetting,
}

/// Trait for document-understanding backends
///
/// Implemented by the infrastructure layer (taxscan-llm)
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Error type for provider operations
    type Error: std::fmt::Display + Send;

    /// Whether a credential is available. The pipeline refuses to call an
    /// unconfigured provider.
    fn is_configured(&self) -> bool;

    /// Run one extraction. `Ok(None)` means the provider answered without any
    /// text payload.
    async fn extract_document(&self, request: &ProviderRequest) -> Result<Option<String>, Self::Error>;
}
