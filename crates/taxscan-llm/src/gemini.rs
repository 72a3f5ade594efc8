//! Gemini Provider Implementation
//!
//! Sends a statement document to the Google Generative Language
//! `generateContent` endpoint with a JSON response schema.
//!
//! # Features
//!
//! - Inline base64 document upload (PDF, JPEG, PNG)
//! - Structured output via `responseSchema`
//! - Configurable endpoint and timeout
//! - Safety filters disabled on request
//!
//! The provider makes exactly one HTTP call per `extract_document`. Retrying
//! is the pipeline's decision, not the transport's.
//!
//! # Examples
//!
//! ```no_run
//! use taxscan_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new(Some("api-key".to_string()))
//!     .with_timeout_secs(120);
//! ```

use crate::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use taxscan_domain::traits::{DocumentProvider, ProviderRequest, SafetySetting};
use tracing::{debug, warn};

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default timeout for a single request. Large multi-page statements take minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable consulted by `from_env`
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

const BLOCKED_FINISH_REASONS: [&str; 4] = ["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT"];

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

/// Request body for the generateContent API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySettingEntry>,
}

#[derive(Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart {
    InlineData { inline_data: InlineData },
    Text { text: String },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Serialize)]
struct SafetySettingEntry {
    category: &'static str,
    threshold: &'static str,
}

/// Response from the generateContent API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// An empty or missing key yields an unconfigured provider.
    pub fn new(api_key: Option<String>) -> Self {
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            timeout,
            client: build_client(timeout),
        }
    }

    /// Create a provider using the `GEMINI_API_KEY` environment variable
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_ENV).ok())
    }

    /// Override the API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self.client = build_client(self.timeout);
        self
    }

    fn url_for(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }

    /// Send one extraction request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No API key is configured
    /// - The network call fails or times out
    /// - The API answers with a non-success status
    /// - The prompt is blocked by the safety filter
    pub async fn generate(&self, request: &ProviderRequest) -> Result<Option<String>, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingCredential)?;
        let body = build_request_body(request)?;
        let url = self.url_for(&request.model);

        debug!(
            "POST {} ({} base64 chars, {})",
            url,
            request.document.data().len(),
            request.document.mime_type()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Communication(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(parse_error_body(status.as_u16(), &text));
        }

        parse_response_body(&text)
    }
}

#[async_trait]
impl DocumentProvider for GeminiProvider {
    type Error = ProviderError;

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn extract_document(&self, request: &ProviderRequest) -> Result<Option<String>, Self::Error> {
        self.generate(request).await
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}

fn build_request_body(request: &ProviderRequest) -> Result<GenerateContentRequest, ProviderError> {
    let response_schema: Value = serde_json::from_str(&request.response_schema)
        .map_err(|e| ProviderError::Other(format!("Invalid response schema: {}", e)))?;

    let safety_settings = match request.safety {
        SafetySetting::BlockNone => HARM_CATEGORIES
            .into_iter()
            .map(|category| SafetySettingEntry {
                category,
                threshold: "BLOCK_NONE",
            })
            .collect(),
        SafetySetting::ProviderDefault => Vec::new(),
    };

    Ok(GenerateContentRequest {
        contents: vec![RequestContent {
            role: "user",
            parts: vec![
                RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: request.document.mime_type().as_str().to_string(),
                        data: request.document.data().to_string(),
                    },
                },
                RequestPart::Text {
                    text: request.instructions.clone(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema,
        },
        safety_settings,
    })
}

fn parse_response_body(body: &str) -> Result<Option<String>, ProviderError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ProviderError::Blocked(reason));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(None);
    };

    let finish_reason = candidate.finish_reason.unwrap_or_default();
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        if BLOCKED_FINISH_REASONS.contains(&finish_reason.as_str()) {
            return Err(ProviderError::Blocked(finish_reason));
        }
        return Ok(None);
    }

    if finish_reason == "MAX_TOKENS" {
        warn!("Provider stopped at its output token limit; response is truncated");
    }

    Ok(Some(text))
}

fn parse_error_body(status: u16, body: &str) -> ProviderError {
    let message = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.status.is_empty() => {
            format!("{}: {}", envelope.error.status, envelope.error.message)
        }
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    };
    ProviderError::Api { status, message }
}
