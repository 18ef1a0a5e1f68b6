//! Shared test helpers for in-memory routing integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use switchyard::routing::{
    adapters::memory::{RecordingSink, ScriptedDelegate, ScriptedWorker},
    domain::{NetworkId, RuleSet, WorkerId, standard_workers},
    services::{CapabilityCatalog, NetworkConfig, NetworkConfigError, RoutingNetwork},
};

/// Network type used across in-memory tests.
pub type TestNetwork = RoutingNetwork<ScriptedDelegate, RecordingSink, DefaultClock>;

/// The standard roster with a short summary per worker.
pub const STANDARD_ROSTER: [(&str, &str); 8] = [
    (standard_workers::DOCUMENTATION, "Writes documentation and comments"),
    (standard_workers::TESTING, "Writes automated tests"),
    (standard_workers::CODE_REVIEW, "Reviews code changes"),
    (standard_workers::REFACTOR, "Restructures existing code"),
    (standard_workers::DEBUGGER, "Diagnoses and fixes defects"),
    (standard_workers::RESEARCH, "Finds and summarises information"),
    (standard_workers::CODER, "Writes new code"),
    (standard_workers::GENERAL, "Handles anything else"),
];

/// Registered workers plus the scripted doubles behind them.
pub struct Roster {
    /// Registry holding every worker.
    pub registry: CapabilityCatalog,
    /// Scripted worker per identifier, for call assertions.
    pub workers: HashMap<&'static str, ScriptedWorker>,
}

impl Roster {
    /// Returns the scripted worker registered under `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` is not part of the roster.
    #[must_use]
    pub fn worker(&self, id: &str) -> &ScriptedWorker {
        self.workers
            .get(id)
            .unwrap_or_else(|| panic!("worker {id} should be in the roster"))
    }

    /// Returns the identifiers of every rostered worker, in order.
    #[must_use]
    pub fn expert_ids() -> Vec<WorkerId> {
        STANDARD_ROSTER
            .iter()
            .map(|(id, _)| WorkerId::new(*id).expect("standard id should be valid"))
            .collect()
    }
}

/// Builds the standard roster, replacing the named workers' behaviour.
///
/// Workers without an override echo `"<id> answered"`.
#[must_use]
pub fn roster_with(replacements: Vec<(&'static str, ScriptedWorker)>) -> Roster {
    let mut overrides: HashMap<&'static str, ScriptedWorker> = replacements.into_iter().collect();
    let mut registry = CapabilityCatalog::new();
    let mut workers = HashMap::new();
    for (id, summary) in STANDARD_ROSTER {
        let worker = overrides
            .remove(id)
            .unwrap_or_else(|| ScriptedWorker::succeeding(format!("{id} answered")));
        registry
            .register(id, Arc::new(worker.clone()), summary)
            .expect("standard worker should register");
        workers.insert(id, worker);
    }
    Roster { registry, workers }
}

/// Provides the standard roster with every worker succeeding.
#[fixture]
pub fn roster() -> Roster {
    roster_with(Vec::new())
}

/// Provides a fresh recording sink.
#[fixture]
pub fn sink() -> RecordingSink {
    RecordingSink::new()
}

/// Standard configuration routing between every rostered worker.
#[must_use]
pub fn standard_config() -> NetworkConfig {
    NetworkConfig::new(
        NetworkId::new("engineering").expect("network id should be valid"),
        Roster::expert_ids(),
    )
    .with_fallback(WorkerId::new(standard_workers::GENERAL).expect("valid id"))
    .with_rules(RuleSet::standard().expect("standard rules should be valid"))
}

/// Builds a network over `roster` with the given delegate and sink.
///
/// # Errors
///
/// Returns [`NetworkConfigError`] when the configuration is rejected.
pub fn build_network(
    config: NetworkConfig,
    roster: &Roster,
    delegate: &ScriptedDelegate,
    sink: &RecordingSink,
) -> Result<TestNetwork, NetworkConfigError> {
    RoutingNetwork::new(
        config,
        &roster.registry,
        Arc::new(delegate.clone()),
        Arc::new(sink.clone()),
        Arc::new(DefaultClock),
    )
}
