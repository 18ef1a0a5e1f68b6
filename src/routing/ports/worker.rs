//! Worker port: anything that can execute a task in a context.

use crate::routing::domain::{InvocationContext, WorkerOutput};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for worker execution.
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Execution contract every catalog entry satisfies, regardless of its
/// prompt or tool configuration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Worker: Send + Sync {
    /// Executes `task` and returns the worker's output.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError`] when the worker cannot complete the task.
    async fn execute(&self, task: &str, context: &InvocationContext) -> WorkerResult<WorkerOutput>;
}

/// Errors returned by worker implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkerError {
    /// The worker rejected or failed the task with a diagnostic message.
    #[error("{0}")]
    Failed(String),

    /// The model provider or a tool behind the worker failed.
    #[error("worker runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkerError {
    /// Creates a failure from a diagnostic message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Wraps a runtime error from the worker's provider or tools.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
