//! Structural category: output-item and content-part boundaries, plus the
//! unknown-event fallback
//!
//! Boundary events are stateless pass-throughs that preserve the nested
//! item/part payloads verbatim. Unknown types are surfaced through the same
//! handler but tagged distinctly, so consumers can tell a recognized
//! boundary from a type this layer has never seen.

use serde_json::json;

use crate::session::SessionState;
use crate::types::{NormalizedEvent, RawEvent};

pub(crate) fn handle(
    event: &RawEvent,
    _state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    match event.event_type.as_str() {
        "response.output_item.added" | "response.output_item.done" => {
            vec![NormalizedEvent::new(
                crate::types::short_name(&event.event_type),
                json!({
                    "output_index": event.payload.get("output_index").cloned().unwrap_or(json!(0)),
                    "item": event.payload.get("item").cloned().unwrap_or(serde_json::Value::Null),
                }),
                sequence,
            )]
        }
        "response.content_part.added" | "response.content_part.done" => {
            vec![NormalizedEvent::new(
                crate::types::short_name(&event.event_type),
                json!({
                    "item_id": event.str_field("item_id"),
                    "content_index": event.payload.get("content_index").cloned().unwrap_or(json!(0)),
                    "part": event.payload.get("part").cloned().unwrap_or(serde_json::Value::Null),
                }),
                sequence,
            )]
        }
        _ => vec![],
    }
}

/// Best-effort normalization for a type this layer does not recognize
///
/// Never drops the event: the raw type and payload pass through under the
/// `unknown` tag for forward compatibility.
pub(crate) fn handle_unknown(
    event: &RawEvent,
    _state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    tracing::debug!(raw_type = %event.event_type, "unrecognized upstream event type");
    vec![NormalizedEvent::new(
        "unknown",
        json!({
            "raw_type": event.event_type,
            "payload": event.payload,
        }),
        sequence,
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_item_payload_preserved_verbatim() {
        let mut state = SessionState::default();
        let item = json!({"type": "message", "id": "msg_1", "content": []});
        let out = handle(
            &RawEvent::new(
                "response.output_item.added",
                json!({"output_index": 2, "item": item}),
            ),
            &mut state,
            1,
        );
        assert_eq!(out[0].event_name, "output_item.added");
        assert_eq!(out[0].data["output_index"], 2);
        assert_eq!(out[0].data["item"]["id"], "msg_1");
    }

    #[test]
    fn test_content_part_passthrough() {
        let mut state = SessionState::default();
        let out = handle(
            &RawEvent::new(
                "response.content_part.done",
                json!({"item_id": "msg_1", "content_index": 0, "part": {"type": "output_text", "text": "hi"}}),
            ),
            &mut state,
            2,
        );
        assert_eq!(out[0].data["part"]["text"], "hi");
    }

    #[test]
    fn test_unknown_tagged_distinctly_from_structural() {
        let mut state = SessionState::default();
        let out = handle_unknown(
            &RawEvent::new("response.telepathy.delta", json!({"delta": "??"})),
            &mut state,
            3,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].event_name, "unknown");
        assert_eq!(out[0].data["raw_type"], "response.telepathy.delta");
        assert_eq!(out[0].data["payload"]["delta"], "??");
    }
}
