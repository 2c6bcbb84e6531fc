//! Lifecycle category: session-level states from creation to termination
//!
//! Terminal events (`completed`, `incomplete`, `failed`) attach a usage
//! snapshot computed by the usage extractor at the configured rates. The
//! in-band `error` event normalizes here too; the dispatcher then tears the
//! session down after yielding it.

use serde_json::json;

use crate::session::SessionState;
use crate::types::{NormalizedEvent, RawEvent};
use crate::usage;

pub(crate) fn handle(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    match event.event_type.as_str() {
        "response.created" | "response.queued" | "response.in_progress" => {
            let response = event.payload.get("response");
            if state.response_id.is_none()
                && let Some(id) = response
                    .and_then(|r| r.get("id"))
                    .and_then(|v| v.as_str())
                && !id.is_empty()
            {
                state.response_id = Some(id.to_string());
            }
            vec![NormalizedEvent::new(
                crate::types::short_name(&event.event_type),
                json!({
                    "response": response.cloned().unwrap_or(serde_json::Value::Null),
                }),
                sequence,
            )]
        }
        "response.completed" | "response.incomplete" | "response.failed" => {
            let response = event
                .payload
                .get("response")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            let snapshot = usage::extract(&response, &state.pricing);
            vec![NormalizedEvent::new(
                crate::types::short_name(&event.event_type),
                json!({
                    "response": response,
                    "usage": snapshot,
                }),
                sequence,
            )]
        }
        "error" => {
            vec![NormalizedEvent::new(
                "error",
                json!({
                    "session_id": state.session_id,
                    "message": error_message(event),
                }),
                sequence,
            )]
        }
        _ => vec![],
    }
}

/// Message carried by an in-band `error` event
pub(crate) fn error_message(event: &RawEvent) -> String {
    event
        .payload
        .get("message")
        .or_else(|| event.payload.get("error").and_then(|e| e.get("message")))
        .and_then(|m| m.as_str())
        .unwrap_or("unknown upstream error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PricingRates;

    #[test]
    fn test_created_records_response_id() {
        let mut state = SessionState::default();
        let out = handle(
            &RawEvent::new(
                "response.created",
                json!({"response": {"id": "resp_9", "status": "in_progress"}}),
            ),
            &mut state,
            1,
        );
        assert_eq!(out[0].event_name, "created");
        assert_eq!(state.response_id.as_deref(), Some("resp_9"));
    }

    #[test]
    fn test_completed_attaches_usage_snapshot() {
        let mut state = SessionState::new(PricingRates::new(0.00125, 0.01));
        let out = handle(
            &RawEvent::new(
                "response.completed",
                json!({"response": {
                    "id": "resp_9",
                    "usage": {"input_tokens": 1000, "output_tokens": 2000, "total_tokens": 3000},
                }}),
            ),
            &mut state,
            8,
        );
        assert_eq!(out[0].event_name, "completed");
        assert_eq!(out[0].data["usage"]["input_tokens"], 1000);
        let cost = out[0].data["usage"]["cost"].as_f64().unwrap();
        assert!((cost - 0.00002125).abs() < 1e-12);
    }

    #[test]
    fn test_failed_without_usage_reports_zero_snapshot() {
        let mut state = SessionState::default();
        let out = handle(
            &RawEvent::new("response.failed", json!({"response": {"id": "resp_9"}})),
            &mut state,
            4,
        );
        assert_eq!(out[0].data["usage"]["total_tokens"], 0);
        assert_eq!(out[0].data["usage"]["cost"], 0.0);
    }

    #[test]
    fn test_error_message_extraction() {
        let nested = RawEvent::new("error", json!({"error": {"message": "rate limited"}}));
        assert_eq!(error_message(&nested), "rate limited");
        let flat = RawEvent::new("error", json!({"message": "boom"}));
        assert_eq!(error_message(&flat), "boom");
        let empty = RawEvent::new("error", json!({}));
        assert_eq!(error_message(&empty), "unknown upstream error");
    }
}
