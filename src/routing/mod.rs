//! Adaptive task routing for Switchyard.
//!
//! A routing network resolves each task to exactly one worker through three
//! tiers: deterministic keyword rules, a semantic model decision, and a
//! designated fallback worker. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
