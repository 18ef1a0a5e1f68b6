//! Scripted worker that answers, fails, or stalls on demand.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::routing::{
    domain::{InvocationContext, WorkerOutput},
    ports::{Worker, WorkerError, WorkerResult},
};

#[derive(Debug, Clone)]
enum Behaviour {
    Succeed(WorkerOutput),
    Fail(String),
    Delay(Duration, WorkerOutput),
    Stall,
}

/// A recorded invocation of a [`ScriptedWorker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCall {
    /// Task text the worker received.
    pub task: String,
    /// Context the worker received.
    pub context: InvocationContext,
}

/// Worker with fixed behaviour that records every call.
#[derive(Debug, Clone)]
pub struct ScriptedWorker {
    behaviour: Behaviour,
    calls: Arc<RwLock<Vec<WorkerCall>>>,
}

impl ScriptedWorker {
    fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Always answers with `text`.
    #[must_use]
    pub fn succeeding(text: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Succeed(WorkerOutput::text(text)))
    }

    /// Always fails with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Fail(reason.into()))
    }

    /// Answers with `text` after `delay`.
    #[must_use]
    pub fn delayed(delay: Duration, text: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Delay(delay, WorkerOutput::text(text)))
    }

    /// Never completes.
    #[must_use]
    pub fn stalling() -> Self {
        Self::with_behaviour(Behaviour::Stall)
    }

    /// Returns the calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<WorkerCall> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl Worker for ScriptedWorker {
    async fn execute(&self, task: &str, context: &InvocationContext) -> WorkerResult<WorkerOutput> {
        self.calls
            .write()
            .map_err(|err| WorkerError::runtime(std::io::Error::other(err.to_string())))?
            .push(WorkerCall {
                task: task.to_owned(),
                context: context.clone(),
            });

        match &self.behaviour {
            Behaviour::Succeed(output) => Ok(output.clone()),
            Behaviour::Fail(reason) => Err(WorkerError::failed(reason.clone())),
            Behaviour::Delay(delay, output) => {
                tokio::time::sleep(*delay).await;
                Ok(output.clone())
            }
            Behaviour::Stall => std::future::pending().await,
        }
    }
}
