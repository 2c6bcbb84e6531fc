//! Midstream — a streaming event normalization layer
//!
//! Sits in front of a generative-AI streaming API and turns its long-lived
//! sequence of loosely-typed raw events into a stable stream of normalized
//! `{event_name, data, sequence}` envelopes, with per-session accumulation,
//! ordering and at-most-one-terminal-error guarantees, and resumability for
//! stored responses.
//!
//! # Example
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use midstream::{Dispatcher, PricingRates, RelayConfig, ResponseRequest};
//!
//! # async fn example() -> Result<(), midstream::RelayError> {
//! let config = RelayConfig::from_env()?.with_pricing(PricingRates::new(0.00125, 0.01));
//! let dispatcher = Dispatcher::from_config(config);
//!
//! let mut events =
//!     dispatcher.open(ResponseRequest::new("gpt-4.1", "Hello there").with_store(true));
//!
//! while let Some(event) = events.next().await {
//!     let event = event?;
//!     println!("#{} {}: {}", event.sequence, event.event_name, event.data);
//! }
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod config;
pub mod dispatcher;
pub mod error;
mod handlers;
pub mod session;
pub mod types;
pub mod upstream;
pub mod usage;

pub use audit::{AuditSink, NoopAuditSink, SessionRecord, TracingAuditSink};
pub use config::{PricingRates, RelayConfig};
pub use dispatcher::Dispatcher;
pub use error::RelayError;
pub use session::{SessionState, ToolCallRecord, ToolCallStatus, ToolKind};
pub use types::{EventStream, NormalizedEvent, RawEvent, ResponseRequest};
pub use upstream::{HttpUpstream, RawEventStream, UpstreamClient};
pub use usage::UsageSnapshot;
