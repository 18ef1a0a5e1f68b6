//! Per-request invocation context and caller options.

use super::{NetworkId, ResourceId, ThreadId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

/// Identifiers and passthrough options handed to every worker invocation.
///
/// A context is created once per top-level call and never reused across
/// unrelated tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    resource_id: ResourceId,
    thread_id: ThreadId,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    passthrough: Map<String, Value>,
}

impl InvocationContext {
    /// Creates a context from explicit identifiers.
    #[must_use]
    pub fn new(resource_id: ResourceId, thread_id: ThreadId) -> Self {
        Self {
            resource_id,
            thread_id,
            passthrough: Map::new(),
        }
    }

    /// Resolves the context for one request from caller options.
    ///
    /// The resource defaults to the network identifier and a fresh thread
    /// identifier is synthesised when the caller supplies none.
    #[must_use]
    pub fn resolve(network_id: &NetworkId, options: &ExecuteOptions) -> Self {
        let resource_id = options
            .resource_id
            .as_deref()
            .and_then(ResourceId::from_caller)
            .unwrap_or_else(|| ResourceId::for_network(network_id));
        let thread_id = options
            .thread_id
            .as_deref()
            .and_then(ThreadId::from_caller)
            .unwrap_or_else(ThreadId::generate);
        Self {
            resource_id,
            thread_id,
            passthrough: options.passthrough.clone(),
        }
    }

    /// Adds a passthrough option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.passthrough.insert(key.into(), value);
        self
    }

    /// Returns the speaking resource identifier.
    #[must_use]
    pub const fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    /// Returns the conversation thread identifier.
    #[must_use]
    pub const fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    /// Returns the caller's passthrough options.
    #[must_use]
    pub const fn passthrough(&self) -> &Map<String, Value> {
        &self.passthrough
    }
}

/// Options accepted by a top-level routing call.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    thread_id: Option<String>,
    resource_id: Option<String>,
    passthrough: Map<String, Value>,
    cancellation: Option<CancellationToken>,
}

impl ExecuteOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues an existing conversation thread.
    #[must_use]
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Overrides the speaking resource identifier.
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Adds an option passed through to the selected worker unchanged.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.passthrough.insert(key.into(), value);
        self
    }

    /// Attaches an external cancellation signal.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns the cancellation signal, if any.
    #[must_use]
    pub const fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }
}
