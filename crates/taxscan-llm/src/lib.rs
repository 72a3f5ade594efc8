//! taxscan Provider Layer
//!
//! Pluggable document-understanding backends.
//!
//! # Architecture
//!
//! This crate provides implementations of the `DocumentProvider` trait from
//! `taxscan-domain`. The extraction pipeline only ever sees the trait, so
//! backends and tiers can be swapped freely.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted responses for testing
//! - `GeminiProvider`: Google Generative Language `generateContent` API
//!
//! # Examples
//!
//! ```
//! use taxscan_llm::MockProvider;
//! use taxscan_domain::traits::DocumentProvider;
//!
//! let provider = MockProvider::new("[]");
//! assert!(provider.is_configured());
//! assert_eq!(provider.call_count(), 0);
//! ```

#![warn(missing_docs)]

pub mod gemini;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use taxscan_domain::traits::{DocumentProvider, ProviderRequest};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur while talking to a provider
///
/// The `Display` text keeps the provider's own status codes and wording so the
/// pipeline can classify it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status from the provider API
    #[error("HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider error status and message
        message: String,
    },

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request rejected by the provider's safety filter
    #[error("Blocked by safety filter: {0}")]
    Blocked(String),

    /// No API key configured
    #[error("Missing API key")]
    MissingCredential,

    /// Generic error
    #[error("Provider error: {0}")]
    Other(String),
}

/// One scripted answer for `MockProvider`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Return this text payload
    Text(String),
    /// Return no text payload
    Empty,
    /// Fail with `ProviderError::Other` carrying this message
    Error(String),
}

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<MockResponse>,
    calls: Vec<String>,
}

/// Mock provider for deterministic testing
///
/// Scripted responses are consumed in order; once the script runs out every
/// call gets the fallback response. No network calls are made.
///
/// # Examples
///
/// ```
/// use taxscan_llm::{MockProvider, MockResponse};
///
/// let provider = MockProvider::scripted(vec![MockResponse::Empty, MockResponse::Text("[]".into())]);
/// assert_eq!(provider.remaining(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    fallback: MockResponse,
    configured: bool,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a MockProvider that always returns `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_fallback(MockResponse::Text(response.into()))
    }

    /// Create a MockProvider that always returns no text
    pub fn empty() -> Self {
        Self::with_fallback(MockResponse::Empty)
    }

    /// Create a MockProvider that always fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_fallback(MockResponse::Error(message.into()))
    }

    /// Create a MockProvider that plays `script` then returns no text
    pub fn scripted(script: Vec<MockResponse>) -> Self {
        let provider = Self::empty();
        provider.state().script = script.into();
        provider
    }

    fn with_fallback(fallback: MockResponse) -> Self {
        Self {
            fallback,
            configured: true,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Pretend no API key is configured
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Queue another scripted response
    pub fn push(&self, response: MockResponse) {
        self.state().script.push_back(response);
    }

    /// Number of `extract_document` calls so far
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Model identifiers seen, in call order
    pub fn models_requested(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Scripted responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.state().script.len()
    }

    /// Reset the call log
    pub fn reset_call_count(&self) {
        self.state().calls.clear();
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

#[async_trait]
impl DocumentProvider for MockProvider {
    type Error = ProviderError;

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn extract_document(&self, request: &ProviderRequest) -> Result<Option<String>, Self::Error> {
        let next = {
            let mut state = self.state();
            state.calls.push(request.model.clone());
            state.script.pop_front().unwrap_or_else(|| self.fallback.clone())
        };

        match next {
            MockResponse::Text(text) => Ok(Some(text)),
            MockResponse::Empty => Ok(None),
            MockResponse::Error(message) => Err(ProviderError::Other(message)),
        }
    }
}
