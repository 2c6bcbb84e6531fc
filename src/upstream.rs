//! Upstream channel: opening, resuming, and retrieving responses
//!
//! The dispatcher consumes raw events through the `UpstreamClient` trait so
//! the dispatch loop can be driven by an in-memory source in tests. The
//! HTTP implementation speaks the upstream SSE protocol with reqwest and
//! eventsource-stream.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::Stream;
use futures_util::StreamExt;
use serde_json::Value;
use std::pin::Pin;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::types::{RawEvent, ResponseRequest};

/// Raw upstream event stream for one session
pub type RawEventStream = Pin<Box<dyn Stream<Item = Result<RawEvent, RelayError>> + Send>>;

/// Source of raw upstream event sequences and terminal responses
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Open a fresh streamed response for a request
    async fn open_stream(&self, request: &ResponseRequest) -> Result<RawEventStream, RelayError>;

    /// Re-open the event sequence of a stored response by identifier
    ///
    /// Requires that the original session was created with persistence
    /// enabled upstream; otherwise this surfaces a not-found failure.
    async fn resume_stream(&self, response_id: &str) -> Result<RawEventStream, RelayError>;

    /// Perform the identical call without streaming, returning the single
    /// terminal response object
    async fn retrieve(&self, request: &ResponseRequest) -> Result<Value, RelayError>;

    /// Fetch a stored terminal response by identifier
    async fn retrieve_stored(&self, response_id: &str) -> Result<Value, RelayError>;
}

/// HTTP/SSE implementation of the upstream channel
#[derive(Clone)]
pub struct HttpUpstream {
    config: RelayConfig,
    http_client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_http_client(config: RelayConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn build_headers(&self) -> Result<reqwest::header::HeaderMap, RelayError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let bearer = format!("Bearer {}", self.config.api_key_value());
        let mut auth = reqwest::header::HeaderValue::from_str(&bearer)
            .map_err(|e| RelayError::ConfigError(format!("invalid API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        for (key, value) in &self.config.headers {
            let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| RelayError::HttpError(format!("invalid header name: {e}")))?;
            let value = reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| RelayError::HttpError(format!("invalid header value: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RelayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RelayError::NotFound(body));
        }
        Err(RelayError::api_error(status.as_u16(), body))
    }

    /// Parse an SSE byte stream into raw events
    ///
    /// Empty frames and the `[DONE]` sentinel are skipped; everything else
    /// is surfaced, including frames without a recognizable discriminator.
    fn into_raw_events(response: reqwest::Response) -> RawEventStream {
        let stream = response
            .bytes_stream()
            .eventsource()
            .filter_map(|frame| async move {
                match frame {
                    Ok(frame) => {
                        let data = frame.data.trim();
                        if data.is_empty() || data == "[DONE]" {
                            return None;
                        }
                        Some(RawEvent::from_sse_frame(&frame.event, data))
                    }
                    Err(e) => Some(Err(RelayError::StreamError(format!(
                        "SSE parsing error: {e}"
                    )))),
                }
            });
        Box::pin(stream)
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn open_stream(&self, request: &ResponseRequest) -> Result<RawEventStream, RelayError> {
        let url = format!("{}/responses", self.config.base_url);
        tracing::debug!(%url, model = %request.model, "opening upstream stream");
        let response = self
            .http_client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&request.to_body(true))
            .send()
            .await
            .map_err(|e| RelayError::HttpError(format!("failed to send request: {e}")))?;
        let response = Self::check_status(response).await?;
        Ok(Self::into_raw_events(response))
    }

    async fn resume_stream(&self, response_id: &str) -> Result<RawEventStream, RelayError> {
        let url = format!(
            "{}/responses/{}?stream=true",
            self.config.base_url, response_id
        );
        tracing::debug!(%url, "resuming upstream stream");
        let response = self
            .http_client
            .get(&url)
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| RelayError::HttpError(format!("failed to send request: {e}")))?;
        let response = Self::check_status(response).await?;
        Ok(Self::into_raw_events(response))
    }

    async fn retrieve(&self, request: &ResponseRequest) -> Result<Value, RelayError> {
        let url = format!("{}/responses", self.config.base_url);
        let response = self
            .http_client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&request.to_body(false))
            .send()
            .await
            .map_err(|e| RelayError::HttpError(format!("failed to send request: {e}")))?;
        let response = Self::check_status(response).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| RelayError::ParseError(format!("invalid response body: {e}")))
    }

    async fn retrieve_stored(&self, response_id: &str) -> Result<Value, RelayError> {
        let url = format!("{}/responses/{}", self.config.base_url, response_id);
        let response = self
            .http_client
            .get(&url)
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| RelayError::HttpError(format!("failed to send request: {e}")))?;
        let response = Self::check_status(response).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| RelayError::ParseError(format!("invalid response body: {e}")))
    }
}
