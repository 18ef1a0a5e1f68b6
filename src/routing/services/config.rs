//! Network construction configuration.

use crate::routing::domain::{NetworkId, RoutingDomainError, RuleSet, SemanticModelConfig, WorkerId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that stop a network from starting.
#[derive(Debug, Clone, Error)]
pub enum NetworkConfigError {
    /// A configured value failed domain validation.
    #[error(transparent)]
    Domain(#[from] RoutingDomainError),

    /// The configuration document could not be decoded.
    #[error("invalid network configuration: {0}")]
    InvalidDocument(#[source] Arc<serde_json::Error>),

    /// The worker registry has no entries.
    #[error("worker registry is empty")]
    EmptyRegistry,

    /// None of the configured expert identifiers is registered.
    #[error("network {0} has no registered experts")]
    NoValidExperts(NetworkId),

    /// The fallback identifier does not resolve to a registered worker.
    #[error("fallback worker '{0}' is not registered")]
    InvalidFallback(WorkerId),

    /// The semantic decision prompt could not be rendered.
    #[error("failed to render routing instructions: {0}")]
    Template(#[source] Arc<minijinja::Error>),
}

/// Everything needed to construct a routing network.
///
/// Built once at start-up; the network treats it as read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network identifier, also the default speaking resource.
    pub network_id: NetworkId,
    /// Registered workers this network may route to, in catalog order.
    pub expert_ids: Vec<WorkerId>,
    /// Always-available worker. Defaults to the first resolved expert.
    #[serde(default)]
    pub fallback_id: Option<WorkerId>,
    /// Deterministic rules, specific families first.
    #[serde(default)]
    pub rules: RuleSet,
    /// Model used by the semantic tier.
    #[serde(default)]
    pub semantic: SemanticModelConfig,
    /// Upper bound on each tier attempt, in milliseconds.
    #[serde(default)]
    pub tier_timeout_ms: Option<u64>,
}

impl NetworkConfig {
    /// Creates a configuration with no rules, no explicit fallback, the
    /// default semantic model, and no tier timeout.
    #[must_use]
    pub fn new(network_id: NetworkId, expert_ids: Vec<WorkerId>) -> Self {
        Self {
            network_id,
            expert_ids,
            fallback_id: None,
            rules: RuleSet::empty(),
            semantic: SemanticModelConfig::default(),
            tier_timeout_ms: None,
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkConfigError::InvalidDocument`] when the document is
    /// malformed or contains invalid identifiers or rules.
    pub fn from_json(json: &str) -> Result<Self, NetworkConfigError> {
        serde_json::from_str(json).map_err(|err| NetworkConfigError::InvalidDocument(Arc::new(err)))
    }

    /// Designates the fallback worker.
    #[must_use]
    pub fn with_fallback(mut self, fallback_id: WorkerId) -> Self {
        self.fallback_id = Some(fallback_id);
        self
    }

    /// Replaces the rule set.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the semantic model configuration.
    #[must_use]
    pub fn with_semantic_model(mut self, semantic: SemanticModelConfig) -> Self {
        self.semantic = semantic;
        self
    }

    /// Bounds every tier attempt by `timeout`.
    #[must_use]
    pub fn with_tier_timeout(mut self, timeout: Duration) -> Self {
        self.tier_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Returns the per-tier timeout, if configured.
    #[must_use]
    pub fn tier_timeout(&self) -> Option<Duration> {
        self.tier_timeout_ms.map(Duration::from_millis)
    }
}
