//! Shared builders for routing unit tests.

use std::sync::Arc;

use crate::routing::{
    adapters::memory::ScriptedWorker,
    domain::{NetworkId, WorkerId, standard_workers},
    ports::Worker,
    services::CapabilityCatalog,
};

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

pub fn worker_id(value: &str) -> WorkerId {
    WorkerId::new(value).expect("test worker id should be valid")
}

pub fn network_id() -> NetworkId {
    NetworkId::new("engineering").expect("test network id should be valid")
}

/// Registers every standard worker as a succeeding scripted worker that
/// echoes its own identifier.
pub fn standard_catalog() -> CapabilityCatalog {
    let mut catalog = CapabilityCatalog::new();
    for (id, summary) in STANDARD_ROSTER {
        let handle: Arc<dyn Worker> = Arc::new(ScriptedWorker::succeeding(format!("{id} done")));
        catalog
            .register(id, handle, summary)
            .expect("standard worker should register");
    }
    catalog
}
