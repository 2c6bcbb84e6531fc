//! MCP category: remote MCP tool calls and tool listings

use serde_json::json;

use crate::session::{SessionState, ToolCallStatus, ToolKind};
use crate::types::{NormalizedEvent, RawEvent};

pub(crate) fn handle(
    event: &RawEvent,
    state: &mut SessionState,
    sequence: u64,
) -> Vec<NormalizedEvent> {
    match event.event_type.as_str() {
        "response.mcp_call_arguments.delta" => {
            let call_id = event.call_id().to_string();
            let delta = event.str_field("delta");
            let record = state.tool_call_mut(&call_id, ToolKind::Mcp);
            record.input.push_str(delta);
            vec![NormalizedEvent::new(
                "mcp_call_arguments.delta",
                json!({"item_id": call_id, "delta": delta}),
                sequence,
            )]
        }
        "response.mcp_call_arguments.done" => {
            let call_id = event.call_id().to_string();
            let record = state.tool_call_mut(&call_id, ToolKind::Mcp);
            let arguments = event
                .payload
                .get("arguments")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| record.input.clone());
            record.input = arguments.clone();
            vec![NormalizedEvent::new(
                "mcp_call_arguments.done",
                json!({"item_id": call_id, "arguments": arguments}),
                sequence,
            )]
        }
        "response.mcp_call.completed" => {
            let call_id = event.call_id().to_string();
            let record = state.tool_call_mut(&call_id, ToolKind::Mcp);
            record.status = ToolCallStatus::Completed;
            record.result = Some(
                event
                    .payload
                    .get("output")
                    .cloned()
                    .unwrap_or(serde_json::Value::Null),
            );
            vec![NormalizedEvent::new(
                "mcp_call.completed",
                json!({"item_id": call_id}),
                sequence,
            )]
        }
        "response.mcp_call.failed" => {
            let call_id = event.call_id().to_string();
            let record = state.tool_call_mut(&call_id, ToolKind::Mcp);
            record.status = ToolCallStatus::Failed;
            vec![NormalizedEvent::new(
                "mcp_call.failed",
                json!({
                    "item_id": call_id,
                    "error": event.payload.get("error").cloned().unwrap_or(serde_json::Value::Null),
                }),
                sequence,
            )]
        }
        "response.mcp_call.in_progress" => {
            let call_id = event.call_id().to_string();
            state.tool_call_mut(&call_id, ToolKind::Mcp);
            vec![NormalizedEvent::new(
                "mcp_call.in_progress",
                json!({"item_id": call_id}),
                sequence,
            )]
        }
        // Tool listings carry no call record; they are stateless
        // pass-throughs of the listing payload.
        "response.mcp_list_tools.in_progress"
        | "response.mcp_list_tools.completed"
        | "response.mcp_list_tools.failed" => {
            vec![NormalizedEvent::new(
                crate::types::short_name(&event.event_type),
                json!({
                    "item_id": event.str_field("item_id"),
                    "tools": event.payload.get("tools").cloned().unwrap_or(serde_json::Value::Null),
                }),
                sequence,
            )]
        }
        other => {
            // Future mcp_call.* / mcp_list_tools.* variants reached via the
            // prefix rule.
            vec![NormalizedEvent::new(
                crate::types::short_name(other),
                json!({"item_id": event.str_field("item_id")}),
                sequence,
            )]
        }
    }
}
