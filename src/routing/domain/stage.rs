//! Named stages of the routing engine's state machine.

use super::{ParseRoutingNameError, RoutingDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of one routing request.
///
/// ```text
/// Start -> RuleAttempt -> WorkerExec ------> Done
///                      |             \
///                      |              +--> FallbackAttempt -> Done | Fail
///                      +-> SemanticAttempt -> Done
///                                        \-> FallbackAttempt
/// ```
///
/// A failed rule-matched worker goes straight to the fallback: a
/// high-confidence match that fails is recoverable only by the generalist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStage {
    /// Request accepted; input not yet normalised.
    Start,
    /// Consulting deterministic rules.
    RuleAttempt,
    /// Executing the rule-matched worker.
    WorkerExec,
    /// Delegating selection and execution to the semantic tier.
    SemanticAttempt,
    /// Executing the fallback worker.
    FallbackAttempt,
    /// A worker produced the answer.
    Done,
    /// The fallback worker failed; the request is unrecoverable.
    Fail,
}

impl RoutingStage {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::RuleAttempt => "rule_attempt",
            Self::WorkerExec => "worker_exec",
            Self::SemanticAttempt => "semantic_attempt",
            Self::FallbackAttempt => "fallback_attempt",
            Self::Done => "done",
            Self::Fail => "fail",
        }
    }

    /// Returns whether the engine may move from this stage to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Start, Self::RuleAttempt)
                | (Self::RuleAttempt, Self::WorkerExec | Self::SemanticAttempt)
                | (
                    Self::WorkerExec | Self::SemanticAttempt,
                    Self::Done | Self::FallbackAttempt
                )
                | (Self::FallbackAttempt, Self::Done | Self::Fail)
        )
    }

    /// Returns whether the stage ends the request.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Fail)
    }

    /// Validates a transition.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::InvalidStageTransition`] when the
    /// transition is not in the table above.
    pub const fn transition_to(self, next: Self) -> Result<Self, RoutingDomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(RoutingDomainError::InvalidStageTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for RoutingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RoutingStage {
    type Error = ParseRoutingNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "rule_attempt" => Ok(Self::RuleAttempt),
            "worker_exec" => Ok(Self::WorkerExec),
            "semantic_attempt" => Ok(Self::SemanticAttempt),
            "fallback_attempt" => Ok(Self::FallbackAttempt),
            "done" => Ok(Self::Done),
            "fail" => Ok(Self::Fail),
            _ => Err(ParseRoutingNameError {
                kind: "stage",
                value: value.to_owned(),
            }),
        }
    }
}
