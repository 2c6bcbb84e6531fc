//! Tool-calling category: function, custom, code interpreter, file search,
//! and web search subtypes
//!
//! Every subtype resolves or creates exactly one `ToolCallRecord` keyed by
//! the call identifier carried in the raw event; events without an
//! identifier key under `"unknown"` rather than being dropped.

use serde_json::json;

use crate::session::{SessionState, ToolCallStatus, ToolKind};
use crate::types::{NormalizedEvent, RawEvent};

pub(crate) fn handle(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    match event.event_type.as_str() {
        // Function calls: argument deltas append to the record's input.
        "response.function_call_arguments.delta" => {
            arguments_delta(event, state, sequence, ToolKind::Function, "function_call_arguments.delta")
        }
        "response.function_call_arguments.done" => arguments_done(
            event,
            state,
            sequence,
            ToolKind::Function,
            "function_call_arguments.done",
        ),

        // Custom tools: identical shape to function calls, tagged custom.
        "response.custom_tool_call_input.delta" => {
            arguments_delta(event, state, sequence, ToolKind::Custom, "custom_tool_call_input.delta")
        }
        "response.custom_tool_call_input.done" => arguments_done(
            event,
            state,
            sequence,
            ToolKind::Custom,
            "custom_tool_call_input.done",
        ),

        // Code interpreter: code deltas append to the record's code field.
        "response.code_interpreter_call_code.delta" => {
            let call_id = event.call_id().to_string();
            let delta = event.str_field("delta");
            let record = state.tool_call_mut(&call_id, ToolKind::CodeInterpreter);
            record.code.push_str(delta);
            vec![NormalizedEvent::new(
                "code_interpreter_call_code.delta",
                json!({"item_id": call_id, "delta": delta}),
                sequence,
            )]
        }
        "response.code_interpreter_call_code.done" => {
            let call_id = event.call_id().to_string();
            let record = state.tool_call_mut(&call_id, ToolKind::CodeInterpreter);
            let code = event
                .payload
                .get("code")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| record.code.clone());
            record.code = code.clone();
            vec![NormalizedEvent::new(
                "code_interpreter_call_code.done",
                json!({"item_id": call_id, "code": code}),
                sequence,
            )]
        }
        "response.code_interpreter_call.completed" => {
            let call_id = event.call_id().to_string();
            let record = state.tool_call_mut(&call_id, ToolKind::CodeInterpreter);
            record.status = ToolCallStatus::Completed;
            record.result = Some(
                event
                    .payload
                    .get("outputs")
                    .cloned()
                    .unwrap_or(serde_json::Value::Null),
            );
            vec![NormalizedEvent::new(
                "code_interpreter_call.completed",
                json!({"item_id": call_id}),
                sequence,
            )]
        }

        // Search completions store results on the implicit call context.
        "response.file_search_call.completed" => {
            search_completed(event, state, sequence, ToolKind::FileSearch, "file_search_call.completed")
        }
        "response.web_search_call.completed" => {
            search_completed(event, state, sequence, ToolKind::WebSearch, "web_search_call.completed")
        }

        // Progress subtypes (in_progress / searching / interpreting and any
        // future variants in these families) are stateless pass-throughs,
        // but still pin the call record so the identifier is tracked.
        other => {
            let kind = if other.starts_with("response.code_interpreter_call") {
                ToolKind::CodeInterpreter
            } else if other.starts_with("response.file_search_call.") {
                ToolKind::FileSearch
            } else {
                ToolKind::WebSearch
            };
            let call_id = event.call_id().to_string();
            state.tool_call_mut(&call_id, kind);
            vec![NormalizedEvent::new(
                crate::types::short_name(other),
                json!({"item_id": call_id}),
                sequence,
            )]
        }
    }
}

fn arguments_delta(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
    kind: ToolKind,
    name: &str,
) -> Vec<NormalizedEvent> {
    let call_id = event.call_id().to_string();
    let delta = event.str_field("delta");
    let record = state.tool_call_mut(&call_id, kind);
    record.input.push_str(delta);
    vec![NormalizedEvent::new(
        name,
        json!({"item_id": call_id, "delta": delta}),
        sequence,
    )]
}

fn arguments_done(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
    kind: ToolKind,
    name: &str,
) -> Vec<NormalizedEvent> {
    let call_id = event.call_id().to_string();
    let record = state.tool_call_mut(&call_id, kind);
    // Function argument done payloads use `arguments`; custom tool input
    // done payloads use `input`. Either way the accumulation is the
    // fallback when the final value is absent.
    let arguments = event
        .payload
        .get("arguments")
        .or_else(|| event.payload.get("input"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| record.input.clone());
    record.input = arguments.clone();
    record.status = ToolCallStatus::Completed;
    vec![NormalizedEvent::new(
        name,
        json!({"item_id": call_id, "arguments": arguments}),
        sequence,
    )]
}

fn search_completed(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
    kind: ToolKind,
    name: &str,
) -> Vec<NormalizedEvent> {
    let call_id = event.call_id().to_string();
    let record = state.tool_call_mut(&call_id, kind);
    record.status = ToolCallStatus::Completed;
    record.result = Some(
        event
            .payload
            .get("results")
            .cloned()
            .unwrap_or(serde_json::Value::Null),
    );
    vec![NormalizedEvent::new(
        name,
        json!({"item_id": call_id}),
        sequence,
    )]
}
