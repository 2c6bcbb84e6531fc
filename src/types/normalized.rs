//! Normalized downstream event envelope

use futures::Stream;
use serde::Serialize;
use serde_json::Value;
use std::pin::Pin;

use crate::error::RelayError;

/// The downstream-stable event envelope
///
/// `sequence` is assigned by the dispatcher, not by handlers: it increases by
/// exactly one per raw upstream event consumed, and every normalized event
/// produced from the same raw event carries the same sequence number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEvent {
    /// Short event name (raw type minus the `response.` prefix)
    pub event_name: String,
    /// Serializable event payload
    pub data: Value,
    /// Strictly increasing per-session sequence number
    pub sequence: u64,
}

impl NormalizedEvent {
    pub fn new(event_name: impl Into<String>, data: Value, sequence: u64) -> Self {
        Self {
            event_name: event_name.into(),
            data,
            sequence,
        }
    }
}

/// Strip the upstream `response.` namespace from a raw event type
pub(crate) fn short_name(raw_type: &str) -> &str {
    raw_type.strip_prefix("response.").unwrap_or(raw_type)
}

/// Normalized event stream — one streamed session
///
/// A one-shot cooperative generator over a live upstream channel: each call
/// to the dispatcher's `open` produces one fresh stream, consumed once, in
/// order. Dropping it before exhaustion releases the upstream connection.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<NormalizedEvent, RelayError>> + Send>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_namespace() {
        assert_eq!(short_name("response.output_text.delta"), "output_text.delta");
        assert_eq!(short_name("error"), "error");
    }

    #[test]
    fn test_serializes_with_snake_case_fields() {
        let event = NormalizedEvent::new("output_text.delta", serde_json::json!({"delta": "x"}), 3);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_name"], "output_text.delta");
        assert_eq!(json["sequence"], 3);
    }
}
