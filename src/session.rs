//! Per-session accumulation state
//!
//! One `SessionState` is created per dispatcher invocation and exclusively
//! owned by it for the lifetime of one streamed session. The single-writer
//! guarantee is by construction: the dispatch loop is the only code that
//! ever holds it, so no interior locking is needed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::PricingRates;

/// Kind of tool behind a tool-call record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Function,
    CodeInterpreter,
    FileSearch,
    WebSearch,
    Custom,
    Mcp,
}

/// Lifecycle status of one tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallStatus {
    InProgress,
    Completed,
    Failed,
}

/// Accumulator for one tool invocation within a session
///
/// Created on the first event referencing a previously-unseen call
/// identifier and mutated by every subsequent event bearing the same one.
/// Records are never deleted; they persist for the life of the session so
/// the audit record can report every call that was attempted.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallRecord {
    /// Tool kind, fixed at creation
    pub kind: ToolKind,
    /// Accumulated input/arguments text
    pub input: String,
    /// Accumulated code text (code interpreter only)
    pub code: String,
    /// Current status
    pub status: ToolCallStatus,
    /// Opaque result payload once available
    pub result: Option<Value>,
}

impl ToolCallRecord {
    fn new(kind: ToolKind) -> Self {
        Self {
            kind,
            input: String::new(),
            code: String::new(),
            status: ToolCallStatus::InProgress,
            result: None,
        }
    }
}

/// Mutable accumulator for one streamed session
#[derive(Debug)]
pub struct SessionState {
    /// Unique id for this session, carried in audit records
    pub session_id: Uuid,
    /// When the session was opened
    pub started_at: DateTime<Utc>,
    /// Response id reported by the upstream, once known
    pub response_id: Option<String>,
    /// Accumulated output text
    pub output_text: String,
    /// Accumulated reasoning text
    pub reasoning_text: String,
    /// Accumulated reasoning summary
    pub reasoning_summary: String,
    /// Accumulated base64 audio fragments (opaque encoded blob)
    pub audio_data: String,
    /// Accumulated audio transcript
    pub audio_transcript: String,
    /// Accumulated refusal text
    pub refusal_text: String,
    /// In-flight and finished tool calls, keyed by call identifier
    pub tool_calls: HashMap<String, ToolCallRecord>,
    /// Pricing rates for the usage extractor at terminal events
    pub pricing: PricingRates,
}

impl SessionState {
    pub fn new(pricing: PricingRates) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            response_id: None,
            output_text: String::new(),
            reasoning_text: String::new(),
            reasoning_summary: String::new(),
            audio_data: String::new(),
            audio_transcript: String::new(),
            refusal_text: String::new(),
            tool_calls: HashMap::new(),
            pricing,
        }
    }

    /// Resolve or create the record for a call identifier
    ///
    /// A call identifier, once seen, always maps to exactly one record; the
    /// kind is fixed by whichever event created it.
    pub fn tool_call_mut(&mut self, call_id: &str, kind: ToolKind) -> &mut ToolCallRecord {
        self.tool_calls
            .entry(call_id.to_string())
            .or_insert_with(|| ToolCallRecord::new(kind))
    }

    /// Look up a finished or in-flight record
    pub fn tool_call(&self, call_id: &str) -> Option<&ToolCallRecord> {
        self.tool_calls.get(call_id)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(PricingRates::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_identity() {
        let mut state = SessionState::default();
        state.tool_call_mut("call_1", ToolKind::Function).input.push_str("{\"a\":");
        state.tool_call_mut("call_1", ToolKind::Function).input.push_str("1}");
        state.tool_call_mut("call_2", ToolKind::Custom).input.push_str("other");

        assert_eq!(state.tool_calls.len(), 2);
        assert_eq!(state.tool_call("call_1").unwrap().input, "{\"a\":1}");
        assert_eq!(state.tool_call("call_2").unwrap().input, "other");
    }

    #[test]
    fn test_record_kind_fixed_at_creation() {
        let mut state = SessionState::default();
        state.tool_call_mut("c", ToolKind::Mcp);
        let record = state.tool_call_mut("c", ToolKind::Function);
        assert_eq!(record.kind, ToolKind::Mcp);
    }

    #[test]
    fn test_new_session_is_empty() {
        let state = SessionState::default();
        assert!(state.output_text.is_empty());
        assert!(state.tool_calls.is_empty());
        assert!(state.response_id.is_none());
    }
}
