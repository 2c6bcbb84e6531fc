//! Audit sink for per-event and per-session records
//!
//! The dispatcher notifies the sink once per raw event consumed (type,
//! sequence, redacted payload) and once per session with the terminal
//! status and usage. The record schema beyond that is the collaborator's
//! concern; the default implementation just emits structured tracing events.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::usage::UsageSnapshot;

/// Summary of one finished (or failed) session
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Upstream response id, once the upstream reported one
    pub response_id: Option<String>,
    /// Terminal status: `completed`, `incomplete`, `failed`, `error`, or
    /// `closed` when the upstream ended without a terminal lifecycle event
    pub status: String,
    pub usage: UsageSnapshot,
    /// Raw events consumed, which equals the final sequence number
    pub events_consumed: u64,
}

/// Persistence/audit collaborator interface
pub trait AuditSink: Send + Sync {
    /// Called once per raw event consumed
    fn on_event(&self, session_id: Uuid, sequence: u64, event_type: &str, payload: &Value);

    /// Called once per session, after the stream ends or errors
    fn on_session(&self, record: &SessionRecord);
}

/// Default sink that emits structured tracing events
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn on_event(&self, session_id: Uuid, sequence: u64, event_type: &str, payload: &Value) {
        tracing::debug!(
            %session_id,
            sequence,
            event_type,
            payload = %payload,
            "upstream event"
        );
    }

    fn on_session(&self, record: &SessionRecord) {
        tracing::info!(
            session_id = %record.session_id,
            response_id = record.response_id.as_deref().unwrap_or(""),
            status = %record.status,
            events = record.events_consumed,
            total_tokens = record.usage.total_tokens,
            cost = record.usage.cost,
            "session finished"
        );
    }
}

/// Sink that records nothing
#[derive(Debug, Clone, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn on_event(&self, _: Uuid, _: u64, _: &str, _: &Value) {}
    fn on_session(&self, _: &SessionRecord) {}
}

const REDACT_MAX_LEN: usize = 256;

/// Redact a payload for audit: long string fields are truncated so encoded
/// blobs (audio, images) never land in audit storage wholesale.
pub(crate) fn redact(payload: &Value) -> Value {
    match payload {
        Value::String(s) if s.len() > REDACT_MAX_LEN => {
            let mut end = REDACT_MAX_LEN;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            Value::String(format!("{}...[{} bytes]", &s[..end], s.len()))
        }
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redact_truncates_long_strings() {
        let blob = "A".repeat(4096);
        let payload = json!({"partial_image_b64": blob, "index": 1});
        let redacted = redact(&payload);
        let field = redacted["partial_image_b64"].as_str().unwrap();
        assert!(field.len() < 300);
        assert!(field.ends_with("[4096 bytes]"));
        assert_eq!(redacted["index"], 1);
    }

    #[test]
    fn test_redact_keeps_short_payloads_intact() {
        let payload = json!({"delta": "hello", "nested": {"n": 1}});
        assert_eq!(redact(&payload), payload);
    }
}
