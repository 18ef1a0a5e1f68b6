//! Domain model for task routing.
//!
//! The routing domain models worker identity and capabilities, the rule
//! language used by the deterministic tier, the engine's stage machine, and
//! the per-request context and outcome. All infrastructure concerns (worker
//! execution, model calls, telemetry) live behind ports.

mod context;
mod decision;
mod descriptor;
mod error;
mod ids;
mod input;
mod model_config;
mod outcome;
mod rule;
mod stage;
mod standard_rules;

pub use context::{ExecuteOptions, InvocationContext};
pub use decision::SemanticDecision;
pub use descriptor::CapabilityDescriptor;
pub use error::{DecisionParseError, ParseRoutingNameError, RoutingDomainError};
pub use ids::{NetworkId, ResourceId, ThreadId, WorkerId};
pub use input::{TaskInput, normalize_for_matching};
pub use model_config::SemanticModelConfig;
pub use outcome::{OutcomeParts, RoutingOutcome, RoutingTier, TierFailure, WorkerOutput};
pub use rule::{MatchCondition, RoutingRule, RuleSet};
pub use stage::RoutingStage;
pub use standard_rules::workers as standard_workers;
