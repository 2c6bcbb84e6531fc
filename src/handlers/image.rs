//! Image category: generation progress and partial frames
//!
//! Partial images are emitted immediately, never accumulated — each partial
//! is a complete encoded image at increasing fidelity (0-3 partials by
//! request configuration).

use serde_json::json;

use crate::session::SessionState;
use crate::types::{NormalizedEvent, RawEvent};

pub(crate) fn handle(
    event: &RawEvent,
    _state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    match event.event_type.as_str() {
        "response.image_generation_call.partial_image" => {
            vec![NormalizedEvent::new(
                "image_generation_call.partial_image",
                json!({
                    "item_id": event.str_field("item_id"),
                    "partial_image_index": event
                        .payload
                        .get("partial_image_index")
                        .and_then(|v| v.as_u64())
                        .unwrap_or(0),
                    "partial_image_b64": event.str_field("partial_image_b64"),
                }),
                sequence,
            )]
        }
        "response.image_generation_call.completed" => {
            vec![NormalizedEvent::new(
                "image_generation_call.completed",
                json!({
                    "item_id": event.str_field("item_id"),
                    "result": event.payload.get("result").cloned().unwrap_or(serde_json::Value::Null),
                }),
                sequence,
            )]
        }
        // in_progress / generating and any future progress variants
        other => {
            vec![NormalizedEvent::new(
                crate::types::short_name(other),
                json!({"item_id": event.str_field("item_id")}),
                sequence,
            )]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_image_emitted_immediately() {
        let mut state = SessionState::default();
        let out = handle(
            &RawEvent::new(
                "response.image_generation_call.partial_image",
                json!({
                    "item_id": "img_1",
                    "partial_image_index": 1,
                    "partial_image_b64": "iVBORw0KGgo=",
                }),
            ),
            &mut state,
            5,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].data["partial_image_index"], 1);
        assert_eq!(out[0].data["partial_image_b64"], "iVBORw0KGgo=");
    }

    #[test]
    fn test_progress_events_pass_through() {
        let mut state = SessionState::default();
        let out = handle(
            &RawEvent::new(
                "response.image_generation_call.generating",
                json!({"item_id": "img_1"}),
            ),
            &mut state,
            2,
        );
        assert_eq!(out[0].event_name, "image_generation_call.generating");
    }
}
