//! Application services for task routing.
//!
//! [`RoutingNetwork`] is the entry point. It owns a [`CapabilityCatalog`],
//! a [`RuleTier`], a [`SemanticTier`] and a [`FallbackWorker`], and runs
//! them as a staged state machine.

mod catalog;
mod config;
mod engine;
mod fallback;
mod rule_tier;
mod semantic_tier;

pub use catalog::{CapabilityCatalog, RegistryError, WorkerRegistry};
pub use config::{NetworkConfig, NetworkConfigError};
pub use engine::{RoutingError, RoutingNetwork, RoutingResult};
pub use fallback::FallbackWorker;
pub use rule_tier::{RuleMatch, RuleTier};
pub use semantic_tier::{SemanticSelection, SemanticTier, SemanticTierError};
