//! Results produced by workers and by one routing request.

use super::{InvocationContext, NetworkId, ParseRoutingNameError, RoutingStage, WorkerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Output returned by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerOutput {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl WorkerOutput {
    /// Creates a text-only output.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: None,
        }
    }

    /// Attaches structured data to the output.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns the output text.
    #[must_use]
    pub fn as_text(&self) -> &str {
        &self.text
    }

    /// Returns attached structured data.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

/// The tier that produced the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingTier {
    /// Deterministic pattern rules.
    Rule,
    /// Model-based classification.
    Semantic,
    /// The designated general-purpose worker.
    Fallback,
}

impl RoutingTier {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Semantic => "semantic",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for RoutingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RoutingTier {
    type Error = ParseRoutingNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rule" => Ok(Self::Rule),
            "semantic" => Ok(Self::Semantic),
            "fallback" => Ok(Self::Fallback),
            _ => Err(ParseRoutingNameError {
                kind: "tier",
                value: value.to_owned(),
            }),
        }
    }
}

/// A recoverable failure that made the engine fall through to the next tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierFailure {
    tier: RoutingTier,
    worker: Option<WorkerId>,
    reason: String,
}

impl TierFailure {
    /// Records a failure in `tier`, optionally attributed to a worker.
    #[must_use]
    pub fn new(tier: RoutingTier, worker: Option<WorkerId>, reason: impl Into<String>) -> Self {
        Self {
            tier,
            worker,
            reason: reason.into(),
        }
    }

    /// Returns the tier that failed.
    #[must_use]
    pub const fn tier(&self) -> RoutingTier {
        self.tier
    }

    /// Returns the worker that failed, when one had been selected.
    #[must_use]
    pub const fn worker(&self) -> Option<&WorkerId> {
        self.worker.as_ref()
    }

    /// Returns the failure reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for TierFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(worker) = &self.worker else {
            return write!(f, "{} tier: {}", self.tier, self.reason);
        };
        write!(f, "{} tier ({worker}): {}", self.tier, self.reason)
    }
}

/// Successful result of one routing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingOutcome {
    network_id: NetworkId,
    selected_worker: WorkerId,
    tier: RoutingTier,
    result: WorkerOutput,
    context: InvocationContext,
    fallthrough: Vec<TierFailure>,
    stages: Vec<RoutingStage>,
    completed_at: DateTime<Utc>,
}

/// Parameter object for assembling a [`RoutingOutcome`].
#[derive(Debug, Clone)]
pub struct OutcomeParts {
    /// Network that served the request.
    pub network_id: NetworkId,
    /// The single worker whose result is returned.
    pub selected_worker: WorkerId,
    /// Tier that selected the worker.
    pub tier: RoutingTier,
    /// The worker's output.
    pub result: WorkerOutput,
    /// Context the worker was invoked with.
    pub context: InvocationContext,
    /// Failures that preceded the answer, in order.
    pub fallthrough: Vec<TierFailure>,
    /// Stages visited by the engine, in order.
    pub stages: Vec<RoutingStage>,
    /// Completion timestamp.
    pub completed_at: DateTime<Utc>,
}

impl RoutingOutcome {
    /// Assembles an outcome from its parts.
    #[must_use]
    pub fn from_parts(parts: OutcomeParts) -> Self {
        Self {
            network_id: parts.network_id,
            selected_worker: parts.selected_worker,
            tier: parts.tier,
            result: parts.result,
            context: parts.context,
            fallthrough: parts.fallthrough,
            stages: parts.stages,
            completed_at: parts.completed_at,
        }
    }

    /// Returns the network that served the request.
    #[must_use]
    pub const fn network_id(&self) -> &NetworkId {
        &self.network_id
    }

    /// Returns the worker whose output is returned.
    #[must_use]
    pub const fn selected_worker(&self) -> &WorkerId {
        &self.selected_worker
    }

    /// Returns the tier that answered.
    #[must_use]
    pub const fn tier(&self) -> RoutingTier {
        self.tier
    }

    /// Returns the worker output.
    #[must_use]
    pub const fn result(&self) -> &WorkerOutput {
        &self.result
    }

    /// Returns the invocation context used for the request.
    #[must_use]
    pub const fn context(&self) -> &InvocationContext {
        &self.context
    }

    /// Returns failures that caused fallthrough before the answer.
    #[must_use]
    pub fn fallthrough(&self) -> &[TierFailure] {
        &self.fallthrough
    }

    /// Returns the stages visited, starting with [`RoutingStage::Start`].
    #[must_use]
    pub fn stages(&self) -> &[RoutingStage] {
        &self.stages
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
