//! Observability sink that emits `tracing` events.

use crate::routing::ports::{ObservabilitySink, SpanAttributes, SpanHandle, SpanStatus};
use tracing::{info, trace, warn};

/// Emits one structured event per recorded outcome.
///
/// Each event carries the span name, tier, worker, latency and status, so a
/// `tracing` subscriber can index routing decisions without a separate
/// telemetry backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ObservabilitySink for TracingSink {
    fn start_span(&self, name: &str, attributes: SpanAttributes) -> SpanHandle {
        let handle = SpanHandle::open(name, attributes);
        trace!(span = handle.name(), span_id = handle.id(), "span started");
        handle
    }

    fn record_outcome(&self, handle: &SpanHandle, status: SpanStatus, error: Option<&str>) {
        let attributes = handle.attributes();
        let tier = attributes.get("tier").unwrap_or("-");
        let worker = attributes.get("worker_id").unwrap_or("-");
        let thread = attributes.get("thread_id").unwrap_or("-");
        let latency_ms = u64::try_from(handle.elapsed().as_millis()).unwrap_or(u64::MAX);
        let Some(reason) = error else {
            info!(
                span = handle.name(),
                tier,
                worker,
                thread,
                latency_ms,
                status = %status,
                "routing span completed"
            );
            return;
        };
        warn!(
            span = handle.name(),
            tier,
            worker,
            thread,
            latency_ms,
            status = %status,
            error = reason,
            "routing span failed"
        );
    }

    fn end(&self, handle: SpanHandle) {
        trace!(span = handle.name(), span_id = handle.id(), "span ended");
    }
}
