//! Document payloads handed to an extraction provider

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::path::Path;

/// Accepted statement formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MimeType {
    /// `application/pdf`
    Pdf,
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
}

impl MimeType {
    /// The MIME string sent to the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Pdf => "application/pdf",
            MimeType::Jpeg => "image/jpeg",
            MimeType::Png => "image/png",
        }
    }

    /// Parse a MIME string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "application/pdf" => Some(MimeType::Pdf),
            "image/jpeg" | "image/jpg" => Some(MimeType::Jpeg),
            "image/png" => Some(MimeType::Png),
            _ => None,
        }
    }

    /// Guess the MIME type from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(MimeType::Pdf),
            "jpg" | "jpeg" => Some(MimeType::Jpeg),
            "png" => Some(MimeType::Png),
            _ => None,
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A base64-encoded document with its declared type
///
/// The encoded form never carries a `data:` URI header; constructors strip it.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    data: String,
    mime_type: MimeType,
}

impl DocumentPayload {
    /// Wrap raw file bytes
    pub fn from_bytes(bytes: &[u8], mime_type: MimeType) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            mime_type,
        }
    }

    /// Wrap a base64 string, stripping any `data:<mime>;base64,` header
    ///
    /// # Examples
    ///
    /// ```
    /// use taxscan_domain::{DocumentPayload, MimeType};
    ///
    /// let payload = DocumentPayload::from_data_uri("data:application/pdf;base64,JVBERi0=", MimeType::Pdf);
    /// assert_eq!(payload.data(), "JVBERi0=");
    /// ```
    pub fn from_data_uri(encoded: &str, mime_type: MimeType) -> Self {
        Self {
            data: strip_data_uri_header(encoded).to_string(),
            mime_type,
        }
    }

    /// Base64 body without header
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Declared MIME type
    pub fn mime_type(&self) -> MimeType {
        self.mime_type
    }

    /// Approximate size of the decoded document in bytes
    pub fn decoded_size(&self) -> u64 {
        let body = self.data.trim_end();
        let padding = body.bytes().rev().take_while(|b| *b == b'=').count() as u64;
        (body.len() as u64 * 3 / 4).saturating_sub(padding)
    }
}

impl fmt::Debug for DocumentPayload {
    // Statement contents are financial data; keep them out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentPayload")
            .field("mime_type", &self.mime_type)
            .field("encoded_len", &self.data.len())
            .finish()
    }
}

fn strip_data_uri_header(encoded: &str) -> &str {
    let trimmed = encoded.trim();
    if trimmed.starts_with("data:") {
        if let Some(idx) = trimmed.find(',') {
            return &trimmed[idx + 1..];
        }
    }
    trimmed
}
