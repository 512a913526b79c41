//! In-process publish/subscribe fan-out for change events, feeding SSE
//! subscribers. A single coordinator task drains a bounded broadcast queue
//! and pushes to each subscriber's own bounded queue without blocking on
//! slow readers.

mod broker;
mod sse;

pub use broker::{ChangeBroker, ChangeBrokerConfig, Subscription};
pub use sse::format_sse_event;
