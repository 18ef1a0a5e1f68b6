//! Adapter implementations for routing ports.

pub mod memory;
pub mod noop;
pub mod tracing_sink;

pub use noop::NoopSink;
pub use tracing_sink::TracingSink;
