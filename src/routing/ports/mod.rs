//! Port contracts for task routing.
//!
//! Ports define infrastructure-agnostic interfaces the routing services
//! consume: worker execution, the semantic model call, and telemetry.

pub mod observability;
pub mod semantic;
pub mod worker;

pub use observability::{ObservabilitySink, SpanAttributes, SpanHandle, SpanStatus};
pub use semantic::{
    DecisionMessage, DecisionRequest, DecisionRole, SemanticDelegate, SemanticDelegateError,
    SemanticDelegateResult,
};
pub use worker::{Worker, WorkerError, WorkerResult};

#[cfg(test)]
pub use semantic::MockSemanticDelegate;
#[cfg(test)]
pub use worker::MockWorker;
