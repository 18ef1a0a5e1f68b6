//! Observability sink that keeps spans in memory.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::routing::ports::{ObservabilitySink, SpanAttributes, SpanHandle, SpanStatus};

/// A span captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSpan {
    /// Span name.
    pub name: String,
    /// Attributes given when the span opened.
    pub attributes: SpanAttributes,
    /// Recorded outcome, if any.
    pub status: Option<SpanStatus>,
    /// Recorded error message, if any.
    pub error: Option<String>,
    /// Latency measured when the outcome was recorded.
    pub latency: Option<Duration>,
    /// Whether the span was closed.
    pub ended: bool,
    id: u64,
}

/// Thread-safe in-memory sink for asserting on emitted telemetry.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    spans: Arc<RwLock<Vec<RecordedSpan>>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every span in the order it was opened.
    #[must_use]
    pub fn spans(&self) -> Vec<RecordedSpan> {
        self.spans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the spans with the given name.
    #[must_use]
    pub fn spans_named(&self, name: &str) -> Vec<RecordedSpan> {
        self.spans()
            .into_iter()
            .filter(|span| span.name == name)
            .collect()
    }

    fn update(&self, id: u64, apply: impl FnOnce(&mut RecordedSpan)) {
        let mut spans = self.spans.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(span) = spans.iter_mut().find(|span| span.id == id) {
            apply(span);
        }
    }
}

impl ObservabilitySink for RecordingSink {
    fn start_span(&self, name: &str, attributes: SpanAttributes) -> SpanHandle {
        let handle = SpanHandle::open(name, attributes.clone());
        self.spans
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedSpan {
                name: name.to_owned(),
                attributes,
                status: None,
                error: None,
                latency: None,
                ended: false,
                id: handle.id(),
            });
        handle
    }

    fn record_outcome(&self, handle: &SpanHandle, status: SpanStatus, error: Option<&str>) {
        let latency = handle.elapsed();
        self.update(handle.id(), |span| {
            span.status = Some(status);
            span.error = error.map(str::to_owned);
            span.latency = Some(latency);
        });
    }

    fn end(&self, handle: SpanHandle) {
        self.update(handle.id(), |span| span.ended = true);
    }
}
