//! Observability port: span-style telemetry around tier attempts and
//! worker calls.
//!
//! Sinks only observe. Implementations must not panic or block, and the
//! engine never branches on anything a sink does.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static NEXT_SPAN_ID: AtomicU64 = AtomicU64::new(1);

/// Key/value attributes attached to a span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanAttributes(BTreeMap<&'static str, String>);

impl SpanAttributes {
    /// Creates an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute, replacing any previous value for `key`.
    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.0.insert(key, value.to_string());
        self
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates over attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

/// Handle to an open span.
#[derive(Debug, Clone)]
pub struct SpanHandle {
    id: u64,
    name: String,
    attributes: SpanAttributes,
    started_at: Instant,
}

impl SpanHandle {
    /// Opens a handle with a process-unique identifier.
    #[must_use]
    pub fn open(name: impl Into<String>, attributes: SpanAttributes) -> Self {
        Self {
            id: NEXT_SPAN_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            attributes,
            started_at: Instant::now(),
        }
    }

    /// Returns the span identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the span attributes.
    #[must_use]
    pub const fn attributes(&self) -> &SpanAttributes {
        &self.attributes
    }

    /// Returns the time since the span was opened.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Outcome recorded against a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStatus {
    /// The attempt succeeded.
    Ok,
    /// The attempt abstained (rule tier found no match).
    Skipped,
    /// The attempt failed.
    Error,
    /// The attempt was cancelled by the caller.
    Cancelled,
}

impl SpanStatus {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SpanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Span-style telemetry contract.
pub trait ObservabilitySink: Send + Sync {
    /// Opens a span.
    fn start_span(&self, name: &str, attributes: SpanAttributes) -> SpanHandle;

    /// Records the outcome of the spanned operation.
    fn record_outcome(&self, handle: &SpanHandle, status: SpanStatus, error: Option<&str>);

    /// Closes the span.
    fn end(&self, handle: SpanHandle);
}
