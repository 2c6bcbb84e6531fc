//! Audio category: encoded audio and transcript, both delta/done pairs
//!
//! Audio arrives as base64 fragments whose concatenation is the full encoded
//! blob; the accumulator keeps it opaque.

use serde_json::json;

use crate::session::SessionState;
use crate::types::{NormalizedEvent, RawEvent};

pub(crate) fn handle(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    match event.event_type.as_str() {
        "response.output_audio.delta" => {
            let delta = event.str_field("delta");
            state.audio_data.push_str(delta);
            vec![NormalizedEvent::new(
                "output_audio.delta",
                json!({"delta": delta}),
                sequence,
            )]
        }
        "response.output_audio.done" => {
            // The done event carries no audio payload upstream; the
            // accumulated blob is the final value.
            vec![NormalizedEvent::new(
                "output_audio.done",
                json!({"audio": state.audio_data.clone()}),
                sequence,
            )]
        }
        "response.output_audio_transcript.delta" => {
            let delta = event.str_field("delta");
            state.audio_transcript.push_str(delta);
            vec![NormalizedEvent::new(
                "output_audio_transcript.delta",
                json!({"delta": delta}),
                sequence,
            )]
        }
        "response.output_audio_transcript.done" => {
            let transcript = event
                .payload
                .get("transcript")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| state.audio_transcript.clone());
            vec![NormalizedEvent::new(
                "output_audio_transcript.done",
                json!({"transcript": transcript}),
                sequence,
            )]
        }
        _ => vec![],
    }
}
