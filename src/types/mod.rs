//! Core data types
//!
//! Raw upstream events, the normalized downstream envelope, and the typed
//! request object consumed by the dispatcher.

mod normalized;
mod raw;
mod request;

pub use normalized::{EventStream, NormalizedEvent};
pub(crate) use normalized::short_name;
pub use raw::RawEvent;
pub use request::ResponseRequest;
