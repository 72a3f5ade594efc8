//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use taxscan_domain::{Tier, DEFAULT_DEEP_THRESHOLD_BYTES};

/// Model used for the fast tier unless configured otherwise
pub const DEFAULT_FAST_MODEL: &str = "gemini-2.5-flash";

/// Model used for the deep tier unless configured otherwise
pub const DEFAULT_DEEP_MODEL: &str = "gemini-2.5-pro";

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Backend model for the fast, low-context tier
    pub fast_model: String,

    /// Backend model for the deep, high-context tier
    pub deep_model: String,

    /// Decoded payload size (bytes) above which the deep tier is forced
    pub deep_threshold_bytes: u64,

    /// Ask the provider to disable its content-safety filters
    pub disable_safety_filters: bool,
}

impl ExtractorConfig {
    /// Backend model identifier for a tier
    pub fn model_for(&self, tier: Tier) -> &str {
        match tier {
            Tier::Fast => &self.fast_model,
            Tier::Deep => &self.deep_model,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.fast_model.trim().is_empty() {
            return Err("fast_model must not be empty".to_string());
        }
        if self.deep_model.trim().is_empty() {
            return Err("deep_model must not be empty".to_string());
        }
        if self.deep_threshold_bytes == 0 {
            return Err("deep_threshold_bytes must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            deep_model: DEFAULT_DEEP_MODEL.to_string(),
            deep_threshold_bytes: DEFAULT_DEEP_THRESHOLD_BYTES,
            disable_safety_filters: true,
        }
    }
}
