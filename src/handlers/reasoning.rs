//! Reasoning category: reasoning text and summary, both delta/done pairs

use serde_json::json;

use crate::session::SessionState;
use crate::types::{NormalizedEvent, RawEvent};

pub(crate) fn handle(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    match event.event_type.as_str() {
        "response.reasoning_text.delta" => {
            let delta = event.str_field("delta");
            state.reasoning_text.push_str(delta);
            vec![NormalizedEvent::new(
                "reasoning_text.delta",
                json!({
                    "item_id": event.str_field("item_id"),
                    "delta": delta,
                }),
                sequence,
            )]
        }
        "response.reasoning_text.done" => {
            let text = event
                .payload
                .get("text")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| state.reasoning_text.clone());
            vec![NormalizedEvent::new(
                "reasoning_text.done",
                json!({
                    "item_id": event.str_field("item_id"),
                    "text": text,
                }),
                sequence,
            )]
        }
        "response.reasoning_summary_text.delta" => {
            let delta = event.str_field("delta");
            state.reasoning_summary.push_str(delta);
            vec![NormalizedEvent::new(
                "reasoning_summary_text.delta",
                json!({
                    "item_id": event.str_field("item_id"),
                    "delta": delta,
                }),
                sequence,
            )]
        }
        "response.reasoning_summary_text.done" => {
            let text = event
                .payload
                .get("text")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| state.reasoning_summary.clone());
            vec![NormalizedEvent::new(
                "reasoning_summary_text.done",
                json!({
                    "item_id": event.str_field("item_id"),
                    "text": text,
                }),
                sequence,
            )]
        }
        "response.reasoning_summary_part.added" | "response.reasoning_summary_part.done" => {
            // Summary part boundaries are stateless pass-throughs.
            let part = event
                .payload
                .get("part")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            vec![NormalizedEvent::new(
                crate::types::short_name(&event.event_type),
                json!({
                    "item_id": event.str_field("item_id"),
                    "part": part,
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
    fn test_reasoning_text_and_summary_accumulate_independently() {
        let mut state = SessionState::default();
        handle(
            &RawEvent::new("response.reasoning_text.delta", json!({"delta": "think "})),
            &mut state,
            1,
        );
        handle(
            &RawEvent::new("response.reasoning_text.delta", json!({"delta": "hard"})),
            &mut state,
            2,
        );
        handle(
            &RawEvent::new(
                "response.reasoning_summary_text.delta",
                json!({"delta": "tl;dr"}),
            ),
            &mut state,
            3,
        );

        assert_eq!(state.reasoning_text, "think hard");
        assert_eq!(state.reasoning_summary, "tl;dr");
    }

    #[test]
    fn test_summary_done_fallback() {
        let mut state = SessionState::default();
        state.reasoning_summary.push_str("summary so far");
        let out = handle(
            &RawEvent::new("response.reasoning_summary_text.done", json!({})),
            &mut state,
            4,
        );
        assert_eq!(out[0].event_name, "reasoning_summary_text.done");
        assert_eq!(out[0].data["text"], "summary so far");
    }

    #[test]
    fn test_summary_part_passthrough() {
        let mut state = SessionState::default();
        let out = handle(
            &RawEvent::new(
                "response.reasoning_summary_part.added",
                json!({"part": {"type": "summary_text", "text": ""}}),
            ),
            &mut state,
            5,
        );
        assert_eq!(out[0].event_name, "reasoning_summary_part.added");
        assert_eq!(out[0].data["part"]["type"], "summary_text");
    }
}
