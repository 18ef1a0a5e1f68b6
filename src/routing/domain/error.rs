//! Error types for routing domain validation and parsing.

use super::RoutingStage;
use thiserror::Error;

/// Errors returned while constructing routing domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingDomainError {
    /// The worker identifier is empty after trimming.
    #[error("worker identifier must not be empty")]
    EmptyWorkerId,

    /// The worker identifier contains characters outside `[A-Za-z0-9_-]`.
    #[error(
        "worker identifier '{0}' contains invalid characters (only ASCII alphanumerics, '-' and '_' allowed)"
    )]
    InvalidWorkerId(String),

    /// The worker identifier exceeds the 100-character limit.
    #[error("worker identifier exceeds 100 character limit: {0}")]
    WorkerIdTooLong(String),

    /// The network identifier is empty after trimming.
    #[error("network identifier must not be empty")]
    EmptyNetworkId,

    /// A capability summary is empty after trimming.
    #[error("capability summary for worker '{0}' must not be empty")]
    EmptySummary(String),

    /// A routing rule has an empty name.
    #[error("routing rule name must not be empty")]
    EmptyRuleName,

    /// A routing rule condition has no patterns to match.
    #[error("routing rule '{0}' has an empty condition")]
    EmptyRuleCondition(String),

    /// Two rules in one rule set share a name.
    #[error("duplicate routing rule name: {0}")]
    DuplicateRuleName(String),

    /// A rule set could not be decoded from its serialised form.
    #[error("invalid rule set definition: {0}")]
    InvalidRuleSet(String),

    /// The requested stage transition is not permitted by the engine.
    #[error("invalid routing stage transition from {from} to {to}")]
    InvalidStageTransition {
        /// Stage the engine was in.
        from: RoutingStage,
        /// Stage the engine attempted to enter.
        to: RoutingStage,
    },
}

/// Error returned while parsing a routing tier or stage name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown routing {kind}: {value}")]
pub struct ParseRoutingNameError {
    /// Kind of name being parsed (`tier` or `stage`).
    pub kind: &'static str,
    /// The unrecognised input.
    pub value: String,
}

/// Error returned when a semantic model reply cannot be read as a decision.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecisionParseError {
    /// The reply holds no JSON object.
    #[error("model reply contains no JSON object")]
    MissingJson,

    /// The JSON object does not match the decision shape.
    #[error("model reply is not a valid decision: {0}")]
    InvalidShape(String),

    /// The reply names a worker and also carries a direct response.
    #[error("model reply both selects a worker and answers directly")]
    Ambiguous,

    /// The reply names neither a worker nor a response.
    #[error("model reply selects no worker")]
    Empty,
}
