//! Token usage and cost extraction
//!
//! A pure function over the terminal response object. Missing usage never
//! errors; it yields a zero snapshot with a cost of exactly 0.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PricingRates;

/// Derived token-count and cost summary for one terminal response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub total_tokens: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Cached input tokens, present only for caching-capable responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u64>,
    /// Reasoning output tokens, present only for reasoning-capable models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u64>,
    /// Estimated cost in USD at the configured rates
    pub cost: f64,
}

/// Extract a usage snapshot from a terminal response object
///
/// `response` is the full terminal response value (the object carrying the
/// `usage` field, not the surrounding event payload).
pub fn extract(response: &Value, rates: &PricingRates) -> UsageSnapshot {
    let Some(usage) = response.get("usage").filter(|u| u.is_object()) else {
        return UsageSnapshot::default();
    };

    let input_tokens = usage
        .get("input_tokens")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let output_tokens = usage
        .get("output_tokens")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let total_tokens = usage
        .get("total_tokens")
        .and_then(Value::as_u64)
        .unwrap_or(input_tokens + output_tokens);

    let cached_tokens = usage
        .get("input_tokens_details")
        .and_then(|d| d.get("cached_tokens"))
        .and_then(Value::as_u64);
    let reasoning_tokens = usage
        .get("output_tokens_details")
        .and_then(|d| d.get("reasoning_tokens"))
        .and_then(Value::as_u64);

    let cost = (input_tokens as f64 / 1_000_000.0) * rates.input_per_million
        + (output_tokens as f64 / 1_000_000.0) * rates.output_per_million;

    UsageSnapshot {
        total_tokens,
        input_tokens,
        output_tokens,
        cached_tokens,
        reasoning_tokens,
        cost,
    }
}
