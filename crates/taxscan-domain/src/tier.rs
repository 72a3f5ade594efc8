//! Tier module - fast vs. deep extraction backends

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoded payload size above which the deep tier is always used (10 MiB)
pub const DEFAULT_DEEP_THRESHOLD_BYTES: u64 = 10 * 1024 * 1024;

/// The tier a caller asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderChoice {
    /// Low latency, smaller context window
    #[default]
    Fast,

    /// Slower, large context window for long statements
    Deep,
}

/// The tier actually used for a call
///
/// A `Fast` request can be escalated to `Deep` when the document is large;
/// a `Deep` request is never downgraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Fast, low-context model
    Fast,

    /// High-capacity, high-context model
    Deep,
}

impl Tier {
    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Fast => "fast",
            Tier::Deep => "deep",
        }
    }

    /// Parse a tier from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Some(Tier::Fast),
            "deep" => Some(Tier::Deep),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tier: {}", s))
    }
}

/// Pick the tier for one extraction call
///
/// Deep is chosen when the decoded payload is strictly larger than
/// `threshold_bytes` or when the caller asked for it.
///
/// # Examples
///
/// ```
/// use taxscan_domain::{select_tier, ProviderChoice, Tier, DEFAULT_DEEP_THRESHOLD_BYTES};
///
/// assert_eq!(select_tier(1024, ProviderChoice::Fast, DEFAULT_DEEP_THRESHOLD_BYTES), Tier::Fast);
/// assert_eq!(select_tier(1024, ProviderChoice::Deep, DEFAULT_DEEP_THRESHOLD_BYTES), Tier::Deep);
/// ```
pub fn select_tier(decoded_size_bytes: u64, preference: ProviderChoice, threshold_bytes: u64) -> Tier {
    if decoded_size_bytes > threshold_bytes || preference == ProviderChoice::Deep {
        Tier::Deep
    } else {
        Tier::Fast
    }
}
