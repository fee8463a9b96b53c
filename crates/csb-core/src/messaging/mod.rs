//! Messenger abstractions: inbound update model, outbound port, throttling.

pub mod port;
pub mod throttled;
pub mod types;
