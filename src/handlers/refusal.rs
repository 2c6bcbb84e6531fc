//! Refusal category: delta/done pair for refusal text

use serde_json::json;

use crate::session::SessionState;
use crate::types::{NormalizedEvent, RawEvent};

pub(crate) fn handle(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    match event.event_type.as_str() {
        "response.refusal.delta" => {
            let delta = event.str_field("delta");
            state.refusal_text.push_str(delta);
            vec![NormalizedEvent::new(
                "refusal.delta",
                json!({
                    "item_id": event.str_field("item_id"),
                    "delta": delta,
                }),
                sequence,
            )]
        }
        "response.refusal.done" => {
            let refusal = event
                .payload
                .get("refusal")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| state.refusal_text.clone());
            vec![NormalizedEvent::new(
                "refusal.done",
                json!({
                    "item_id": event.str_field("item_id"),
                    "refusal": refusal,
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

    #[test]
    fn test_refusal_delta_done_pairing() {
        let mut state = SessionState::default();
        handle(
            &RawEvent::new("response.refusal.delta", json!({"delta": "I can"})),
            &mut state,
            1,
        );
        handle(
            &RawEvent::new("response.refusal.delta", json!({"delta": "not."})),
            &mut state,
            2,
        );
        let out = handle(
            &RawEvent::new("response.refusal.done", json!({})),
            &mut state,
            3,
        );
        assert_eq!(out[0].data["refusal"], "I cannot.");
        assert_eq!(state.refusal_text, "I cannot.");
    }
}
