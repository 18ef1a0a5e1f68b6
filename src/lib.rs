//! Switchyard: adaptive task routing across a catalog of workers.
//!
//! A [`RoutingNetwork`](routing::services::RoutingNetwork) receives free-form
//! tasks and dispatches each one to a single worker. Cheap keyword rules are
//! tried first, a model-backed semantic decision second, and a designated
//! fallback worker last, so every request either completes with a worker's
//! output or fails with the reasons from every tier that was attempted.
//!
//! # Architecture
//!
//! Switchyard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure routing logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for workers, model calls and telemetry
//! - **Adapters**: Concrete implementations of ports (tracing, in-memory, etc.)
//!
//! # Modules
//!
//! - [`routing`]: Worker catalog, routing tiers and the routing engine

pub mod routing;
