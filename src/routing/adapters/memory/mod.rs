//! In-memory adapters for routing tests and local deterministic flows.

mod delegate;
mod sink;
mod worker;

pub use delegate::ScriptedDelegate;
pub use sink::{RecordedSpan, RecordingSink};
pub use worker::{ScriptedWorker, WorkerCall};
