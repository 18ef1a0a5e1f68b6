//! Observability sink that records nothing.

use crate::routing::ports::{ObservabilitySink, SpanAttributes, SpanHandle, SpanStatus};

/// Sink used when telemetry is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ObservabilitySink for NoopSink {
    fn start_span(&self, name: &str, attributes: SpanAttributes) -> SpanHandle {
        SpanHandle::open(name, attributes)
    }

    fn record_outcome(&self, _handle: &SpanHandle, _status: SpanStatus, _error: Option<&str>) {}

    fn end(&self, _handle: SpanHandle) {}
}
