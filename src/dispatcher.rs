//! Dispatcher: the streaming event orchestration loop
//!
//! Owns the session state's lifetime, the monotonic sequence counter, and
//! the error boundary. Each call to `open`/`open_stored` starts one fresh
//! session; the returned stream is a one-shot cooperative generator whose
//! only suspension point is pulling the next raw event from the upstream
//! channel, so all state mutation between pulls is single-writer by
//! construction. Dropping the stream before exhaustion releases the
//! upstream connection.

use async_stream::try_stream;
use futures_util::StreamExt;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;

use crate::audit::{self, AuditSink, SessionRecord, TracingAuditSink};
use crate::config::PricingRates;
use crate::error::RelayError;
use crate::handlers;
use crate::session::SessionState;
use crate::types::{EventStream, NormalizedEvent, ResponseRequest};
use crate::upstream::{RawEventStream, UpstreamClient};
use crate::usage::{self, UsageSnapshot};

/// Orchestrator over one upstream client
///
/// Concurrently open sessions are fully independent: they share only this
/// dispatcher's read-only configuration and the audit sink.
pub struct Dispatcher<U: UpstreamClient> {
    upstream: Arc<U>,
    pricing: PricingRates,
    audit: Arc<dyn AuditSink>,
}

impl<U: UpstreamClient + 'static> Dispatcher<U> {
    pub fn new(upstream: U, pricing: PricingRates) -> Self {
        Self {
            upstream: Arc::new(upstream),
            pricing,
            audit: Arc::new(TracingAuditSink),
        }
    }

    /// Replace the default tracing audit sink
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    /// Open a fresh streamed session for a request
    ///
    /// The upstream channel is acquired lazily on first poll; a failure to
    /// open it surfaces through the stream like any other upstream fault.
    pub fn open(&self, request: ResponseRequest) -> EventStream {
        let upstream = Arc::clone(&self.upstream);
        Self::pump(
            async move { upstream.open_stream(&request).await },
            SessionState::new(self.pricing),
            Arc::clone(&self.audit),
        )
    }

    /// Resume the event sequence of a stored response
    ///
    /// Identical output shape to `open`; replay position is upstream-defined.
    /// A response that was not persisted surfaces as a not-found failure
    /// through the same single-error-event contract as any upstream fault.
    pub fn open_stored(&self, response_id: impl Into<String>) -> EventStream {
        let upstream = Arc::clone(&self.upstream);
        let response_id = response_id.into();
        Self::pump(
            async move { upstream.resume_stream(&response_id).await },
            SessionState::new(self.pricing),
            Arc::clone(&self.audit),
        )
    }

    /// Non-streaming retrieval: one terminal response plus its usage
    pub async fn fetch(
        &self,
        request: ResponseRequest,
    ) -> Result<(serde_json::Value, UsageSnapshot), RelayError> {
        let response = self.upstream.retrieve(&request).await?;
        let snapshot = usage::extract(&response, &self.pricing);
        Ok((response, snapshot))
    }

    /// Non-streaming retrieval of a stored response by identifier
    pub async fn fetch_stored(
        &self,
        response_id: &str,
    ) -> Result<(serde_json::Value, UsageSnapshot), RelayError> {
        let response = self.upstream.retrieve_stored(response_id).await?;
        let snapshot = usage::extract(&response, &self.pricing);
        Ok((response, snapshot))
    }

    /// The per-event classify/dispatch/accumulate loop
    ///
    /// The sequence counter advances by exactly one per raw upstream event
    /// consumed; every normalized event a handler produces for that raw
    /// event carries the same number. On an upstream failure — an open
    /// failure, a stream error, or an in-band `error` event — exactly one
    /// `error` normalized event is yielded before the failure itself
    /// terminates the stream.
    fn pump<F>(open: F, mut state: SessionState, sink: Arc<dyn AuditSink>) -> EventStream
    where
        F: Future<Output = Result<RawEventStream, RelayError>> + Send + 'static,
    {
        Box::pin(try_stream! {
            // An open failure becomes a one-item failed stream so the loop
            // below handles every fault through the same arm.
            let mut raw: RawEventStream = match open.await {
                Ok(raw) => raw,
                Err(err) => {
                    let failed: Result<crate::types::RawEvent, RelayError> = Err(err);
                    Box::pin(futures::stream::iter([failed]))
                }
            };

            let mut sequence: u64 = 0;
            let mut terminal: Option<(String, UsageSnapshot)> = None;

            while let Some(item) = raw.next().await {
                sequence += 1;
                match item {
                    Ok(event) => {
                        sink.on_event(
                            state.session_id,
                            sequence,
                            &event.event_type,
                            &audit::redact(&event.payload),
                        );

                        if let Some(status) = terminal_status(&event.event_type) {
                            let response = event
                                .payload
                                .get("response")
                                .cloned()
                                .unwrap_or(serde_json::Value::Null);
                            terminal = Some((status, usage::extract(&response, &state.pricing)));
                        }

                        let in_band_error = event.event_type == "error";
                        for normalized in handlers::dispatch(&event, &mut state, sequence) {
                            yield normalized;
                        }

                        if in_band_error {
                            let message = handlers::lifecycle::error_message(&event);
                            sink.on_session(&session_record(
                                &state,
                                "error",
                                UsageSnapshot::default(),
                                sequence,
                            ));
                            Err(RelayError::UpstreamError(message))?;
                        }
                    }
                    Err(err) => {
                        yield NormalizedEvent::new(
                            "error",
                            json!({
                                "session_id": state.session_id,
                                "message": err.to_string(),
                            }),
                            sequence,
                        );
                        sink.on_session(&session_record(
                            &state,
                            "error",
                            UsageSnapshot::default(),
                            sequence,
                        ));
                        Err(err)?;
                    }
                }
            }

            // Clean end of stream: no terminal marker is synthesized beyond
            // whatever terminal lifecycle event the upstream itself sent.
            let (status, snapshot) =
                terminal.unwrap_or_else(|| ("closed".to_string(), UsageSnapshot::default()));
            sink.on_session(&session_record(&state, &status, snapshot, sequence));
        })
    }
}

impl Dispatcher<crate::upstream::HttpUpstream> {
    /// Build a dispatcher over the HTTP upstream described by a config
    pub fn from_config(config: crate::config::RelayConfig) -> Self {
        let pricing = config.pricing;
        Self::new(crate::upstream::HttpUpstream::new(config), pricing)
    }
}

fn terminal_status(event_type: &str) -> Option<String> {
    match event_type {
        "response.completed" => Some("completed".to_string()),
        "response.incomplete" => Some("incomplete".to_string()),
        "response.failed" => Some("failed".to_string()),
        _ => None,
    }
}

fn session_record(
    state: &SessionState,
    status: &str,
    usage: UsageSnapshot,
    events_consumed: u64,
) -> SessionRecord {
    SessionRecord {
        session_id: state.session_id,
        started_at: state.started_at,
        response_id: state.response_id.clone(),
        status: status.to_string(),
        usage,
        events_consumed,
    }
}
