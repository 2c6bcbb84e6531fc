//! Text category: output text deltas, final text, annotations

use serde_json::json;

use crate::session::SessionState;
use crate::types::{NormalizedEvent, RawEvent};

pub(crate) fn handle(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    match event.event_type.as_str() {
        "response.output_text.delta" => {
            let delta = event.str_field("delta");
            state.output_text.push_str(delta);
            vec![NormalizedEvent::new(
                "output_text.delta",
                json!({
                    "item_id": event.str_field("item_id"),
                    "delta": delta,
                }),
                sequence,
            )]
        }
        "response.output_text.done" => {
            // Some upstream shapes omit the final text; the local
            // accumulation is always available as the fallback.
            let text = event
                .payload
                .get("text")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| state.output_text.clone());
            vec![NormalizedEvent::new(
                "output_text.done",
                json!({
                    "item_id": event.str_field("item_id"),
                    "text": text,
                }),
                sequence,
            )]
        }
        "response.output_text.annotation.added" => {
            let annotation = event
                .payload
                .get("annotation")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            vec![NormalizedEvent::new(
                "output_text.annotation.added",
                json!({
                    "item_id": event.str_field("item_id"),
                    "annotation": annotation,
                }),
                sequence,
            )]
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(event_type: &str, payload: serde_json::Value) -> RawEvent {
        RawEvent::new(event_type, payload)
    }

    #[test]
    fn test_delta_accumulates_and_emits_fragment() {
        let mut state = SessionState::default();
        let out = handle(
            &raw("response.output_text.delta", json!({"delta": "Hel"})),
            &mut state,
            1,
        );
        handle(
            &raw("response.output_text.delta", json!({"delta": "lo"})),
            &mut state,
            2,
        );

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].event_name, "output_text.delta");
        assert_eq!(out[0].data["delta"], "Hel");
        assert_eq!(out[0].sequence, 1);
        assert_eq!(state.output_text, "Hello");
    }

    #[test]
    fn test_done_prefers_upstream_final_value() {
        let mut state = SessionState::default();
        state.output_text.push_str("Hello");
        let out = handle(
            &raw("response.output_text.done", json!({"text": "Hello!"})),
            &mut state,
            3,
        );
        assert_eq!(out[0].data["text"], "Hello!");
    }

    #[test]
    fn test_done_falls_back_to_accumulation() {
        let mut state = SessionState::default();
        state.output_text.push_str("Hello");
        let out = handle(&raw("response.output_text.done", json!({})), &mut state, 3);
        assert_eq!(out[0].data["text"], "Hello");
    }

    #[test]
    fn test_annotation_passes_through() {
        let mut state = SessionState::default();
        let out = handle(
            &raw(
                "response.output_text.annotation.added",
                json!({"item_id": "msg_1", "annotation": {"type": "url_citation", "url": "https://example.com"}}),
            ),
            &mut state,
            4,
        );
        assert_eq!(out[0].data["annotation"]["type"], "url_citation");
        assert!(state.output_text.is_empty());
    }
}
