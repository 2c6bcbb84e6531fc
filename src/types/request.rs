//! Typed request object for opening a session
//!
//! Produced by request validation (an external collaborator); this crate
//! treats it as already well-formed and only serializes it into the upstream
//! request body.

use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;

/// A validated request for one upstream response
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResponseRequest {
    /// Model identifier
    pub model: String,
    /// Input text
    pub input: String,
    /// Optional system instructions
    pub instructions: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f64>,
    /// Output token cap
    pub max_output_tokens: Option<u32>,
    /// Free-form request metadata
    pub metadata: HashMap<String, String>,
    /// Whether the upstream should persist the response (required for resume)
    pub store: bool,
    /// Chain onto a previously stored response
    pub previous_response_id: Option<String>,
    /// Number of partial image frames to request (0-3)
    pub partial_images: Option<u8>,
}

impl ResponseRequest {
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_store(mut self, store: bool) -> Self {
        self.store = store;
        self
    }

    pub fn with_previous_response_id(mut self, id: impl Into<String>) -> Self {
        self.previous_response_id = Some(id.into());
        self
    }

    pub fn with_partial_images(mut self, count: u8) -> Self {
        self.partial_images = Some(count.min(3));
        self
    }

    /// Build the upstream request body
    pub(crate) fn to_body(&self, stream: bool) -> Value {
        let mut body = json!({
            "model": self.model,
            "input": self.input,
            "stream": stream,
        });
        if let Some(instructions) = &self.instructions {
            body["instructions"] = json!(instructions);
        }
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_output_tokens) = self.max_output_tokens {
            body["max_output_tokens"] = json!(max_output_tokens);
        }
        if !self.metadata.is_empty() {
            body["metadata"] = json!(self.metadata);
        }
        if self.store {
            body["store"] = json!(true);
        }
        if let Some(id) = &self.previous_response_id {
            body["previous_response_id"] = json!(id);
        }
        if let Some(count) = self.partial_images {
            body["partial_images"] = json!(count);
        }
        body
    }
}
