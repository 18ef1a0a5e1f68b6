//! The designated always-available worker.

use crate::routing::{
    domain::{InvocationContext, WorkerId, WorkerOutput},
    ports::{Worker, WorkerResult},
    services::CapabilityCatalog,
};
use std::fmt;
use std::sync::Arc;

/// The catalog entry the engine falls back to.
///
/// It executes like any other worker; it is distinguished only by being
/// resolved once at construction, so a network can never lose it.
#[derive(Clone)]
pub struct FallbackWorker {
    id: WorkerId,
    handle: Arc<dyn Worker>,
}

impl FallbackWorker {
    /// Resolves the fallback from `catalog`.
    ///
    /// Returns `None` when `id` is not registered.
    #[must_use]
    pub fn resolve(catalog: &CapabilityCatalog, id: &WorkerId) -> Option<Self> {
        catalog.resolve(id).map(|handle| Self {
            id: id.clone(),
            handle,
        })
    }

    /// Returns the fallback worker's identifier.
    #[must_use]
    pub const fn id(&self) -> &WorkerId {
        &self.id
    }

    /// Executes the fallback worker.
    ///
    /// # Errors
    ///
    /// Returns the worker's own error unchanged.
    pub async fn execute(&self, task: &str, context: &InvocationContext) -> WorkerResult<WorkerOutput> {
        self.handle.execute(task, context).await
    }
}

impl fmt::Debug for FallbackWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackWorker")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
