//! Category handlers for raw upstream events
//!
//! Each raw event type belongs to exactly one of nine semantic categories.
//! Classification is a closed match over the known type strings plus prefix
//! rules for the progress-style tool families; the `Unknown` arm is an
//! explicit, tested variant handled by the structural fallback, so new
//! upstream event types never crash the pipeline.
//!
//! Handler contract: synchronous, non-suspending, returns a finite list of
//! zero or more normalized events, mutating only the session fields the
//! category owns. Handlers never error — absent payload fields degrade to
//! empty/default values.

pub(crate) mod audio;
pub(crate) mod image;
pub(crate) mod lifecycle;
pub(crate) mod mcp;
pub(crate) mod reasoning;
pub(crate) mod refusal;
pub(crate) mod structural;
pub(crate) mod text;
pub(crate) mod tool_calling;

use crate::session::SessionState;
use crate::types::{NormalizedEvent, RawEvent};

/// Semantic category of a raw event type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Lifecycle,
    Text,
    Reasoning,
    ToolCalling,
    Image,
    Audio,
    Mcp,
    Refusal,
    Structural,
    Unknown,
}

impl EventCategory {
    /// Classify a raw event type string
    pub fn classify(event_type: &str) -> Self {
        match event_type {
            "response.created"
            | "response.queued"
            | "response.in_progress"
            | "response.completed"
            | "response.incomplete"
            | "response.failed"
            | "error" => Self::Lifecycle,

            "response.output_text.delta"
            | "response.output_text.done"
            | "response.output_text.annotation.added" => Self::Text,

            "response.reasoning_text.delta"
            | "response.reasoning_text.done"
            | "response.reasoning_summary_text.delta"
            | "response.reasoning_summary_text.done"
            | "response.reasoning_summary_part.added"
            | "response.reasoning_summary_part.done" => Self::Reasoning,

            "response.function_call_arguments.delta"
            | "response.function_call_arguments.done"
            | "response.custom_tool_call_input.delta"
            | "response.custom_tool_call_input.done"
            | "response.code_interpreter_call_code.delta"
            | "response.code_interpreter_call_code.done" => Self::ToolCalling,

            "response.image_generation_call.partial_image" => Self::Image,

            "response.output_audio.delta"
            | "response.output_audio.done"
            | "response.output_audio_transcript.delta"
            | "response.output_audio_transcript.done" => Self::Audio,

            "response.mcp_call_arguments.delta" | "response.mcp_call_arguments.done" => Self::Mcp,

            "response.refusal.delta" | "response.refusal.done" => Self::Refusal,

            "response.output_item.added"
            | "response.output_item.done"
            | "response.content_part.added"
            | "response.content_part.done" => Self::Structural,

            // Progress-style subtypes (`*.in_progress`, `*.searching`,
            // `*.interpreting`, `*.completed`, ...) route by family prefix.
            other => {
                if other.starts_with("response.code_interpreter_call")
                    || other.starts_with("response.file_search_call.")
                    || other.starts_with("response.web_search_call.")
                {
                    Self::ToolCalling
                } else if other.starts_with("response.image_generation_call.") {
                    Self::Image
                } else if other.starts_with("response.mcp_call.")
                    || other.starts_with("response.mcp_list_tools.")
                {
                    Self::Mcp
                } else {
                    Self::Unknown
                }
            }
        }
    }
}

/// Dispatch one raw event to its category handler
///
/// `sequence` is the number assigned to this raw event by the dispatcher;
/// every normalized event produced here carries it unchanged.
pub(crate) fn dispatch(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    match EventCategory::classify(&event.event_type) {
        EventCategory::Lifecycle => lifecycle::handle(event, state, sequence),
        EventCategory::Text => text::handle(event, state, sequence),
        EventCategory::Reasoning => reasoning::handle(event, state, sequence),
        EventCategory::ToolCalling => tool_calling::handle(event, state, sequence),
        EventCategory::Image => image::handle(event, state, sequence),
        EventCategory::Audio => audio::handle(event, state, sequence),
        EventCategory::Mcp => mcp::handle(event, state, sequence),
        EventCategory::Refusal => refusal::handle(event, state, sequence),
        EventCategory::Structural => structural::handle(event, state, sequence),
        EventCategory::Unknown => structural::handle_unknown(event, state, sequence),
    }
}
