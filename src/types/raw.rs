//! Raw upstream event representation

use serde_json::Value;

/// One upstream-defined tagged message from the response stream
///
/// The payload shape is determined solely by `event_type` and is never
/// cross-validated here; handlers read fields tolerantly and treat absent
/// ones as empty.
#[derive(Debug, Clone)]
pub struct RawEvent {
    /// The upstream `type` discriminator (e.g. `response.output_text.delta`)
    pub event_type: String,
    /// The untyped payload bag
    pub payload: Value,
}

impl RawEvent {
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    /// Build a raw event from an SSE frame
    ///
    /// The discriminator comes from the payload's `type` field, falling back
    /// to the SSE event name. A frame with neither is kept with an empty
    /// type string so the dispatcher can route it to the unknown fallback
    /// instead of dropping it.
    pub fn from_sse_frame(event_name: &str, data: &str) -> Result<Self, crate::error::RelayError> {
        let payload: Value = serde_json::from_str(data).map_err(|e| {
            crate::error::RelayError::ParseError(format!("invalid SSE JSON payload: {e}"))
        })?;

        let event_type = payload
            .get("type")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .unwrap_or_else(|| {
                if event_name == "message" {
                    // eventsource defaults unnamed frames to "message"
                    String::new()
                } else {
                    event_name.to_string()
                }
            });

        Ok(Self {
            event_type,
            payload,
        })
    }

    /// Read a string field from the payload, empty when absent
    pub(crate) fn str_field<'a>(&'a self, key: &str) -> &'a str {
        self.payload.get(key).and_then(|v| v.as_str()).unwrap_or("")
    }

    /// The call identifier carried by tool events; `"unknown"` when absent
    pub(crate) fn call_id(&self) -> &str {
        let id = self.str_field("item_id");
        if id.is_empty() { "unknown" } else { id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_payload_wins() {
        let raw = RawEvent::from_sse_frame(
            "message",
            r#"{"type":"response.output_text.delta","delta":"hi"}"#,
        )
        .unwrap();
        assert_eq!(raw.event_type, "response.output_text.delta");
    }

    #[test]
    fn test_type_from_event_name_fallback() {
        let raw = RawEvent::from_sse_frame("response.completed", r#"{"response":{}}"#).unwrap();
        assert_eq!(raw.event_type, "response.completed");
    }

    #[test]
    fn test_missing_discriminator_is_kept() {
        let raw = RawEvent::from_sse_frame("message", r#"{"delta":"hi"}"#).unwrap();
        assert_eq!(raw.event_type, "");
    }

    #[test]
    fn test_call_id_defaults_to_unknown() {
        let raw = RawEvent::new("response.function_call_arguments.delta", serde_json::json!({}));
        assert_eq!(raw.call_id(), "unknown");
    }
}
