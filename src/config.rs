//! Configuration for the upstream connection and cost estimation

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::RelayError;

/// Default upstream base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Per-million-token pricing used by the usage extractor
///
/// Rates are plain configuration data; the crate ships no pricing tables.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingRates {
    /// USD per one million input tokens
    pub input_per_million: f64,
    /// USD per one million output tokens
    pub output_per_million: f64,
}

impl PricingRates {
    pub const fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }
}

/// Upstream connection configuration
#[derive(Clone)]
pub struct RelayConfig {
    /// API key for the upstream service
    pub api_key: SecretString,
    /// Base URL of the upstream API
    pub base_url: String,
    /// Extra headers attached to every upstream request
    pub headers: HashMap<String, String>,
    /// Pricing rates for cost estimation
    pub pricing: PricingRates,
}

impl RelayConfig {
    /// Create a new configuration with the default base URL
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: HashMap::new(),
            pricing: PricingRates::default(),
        }
    }

    /// Load configuration from `MIDSTREAM_API_KEY` / `MIDSTREAM_BASE_URL`
    pub fn from_env() -> Result<Self, RelayError> {
        let api_key = std::env::var("MIDSTREAM_API_KEY").map_err(|_| {
            RelayError::ConfigError("MIDSTREAM_API_KEY environment variable not set".to_string())
        })?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("MIDSTREAM_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Override the upstream base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Attach an extra header to every upstream request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the pricing rates used for cost estimation
    pub fn with_pricing(mut self, pricing: PricingRates) -> Self {
        self.pricing = pricing;
        self
    }

    /// Expose the API key for header construction
    pub(crate) fn api_key_value(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("pricing", &self.pricing)
            .finish()
    }
}
