//! Capability catalog: the read-only lookup table of workers.

use crate::routing::{
    domain::{CapabilityDescriptor, RoutingDomainError, WorkerId},
    ports::Worker,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building a catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The identifier or summary failed validation.
    #[error(transparent)]
    Domain(#[from] RoutingDomainError),

    /// A worker with the same identifier is already registered.
    #[error("duplicate worker identifier: {0}")]
    DuplicateWorker(WorkerId),
}

/// Ordered map from worker identifier to capability summary and handle.
///
/// Entries are added during start-up and never change afterwards, so a
/// catalog shared behind an [`Arc`] can be read by concurrent requests
/// without locking.
#[derive(Clone, Default)]
pub struct CapabilityCatalog {
    descriptors: Vec<CapabilityDescriptor>,
    handles: HashMap<WorkerId, Arc<dyn Worker>>,
}

/// The full worker roster a network selects its experts from.
pub type WorkerRegistry = CapabilityCatalog;

impl CapabilityCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a worker.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Domain`] when the identifier or summary is
    /// invalid, or [`RegistryError::DuplicateWorker`] when the identifier is
    /// already present.
    pub fn register(
        &mut self,
        id: impl AsRef<str>,
        handle: Arc<dyn Worker>,
        summary: impl Into<String>,
    ) -> Result<&mut Self, RegistryError> {
        let worker_id = WorkerId::new(id.as_ref())?;
        if self.handles.contains_key(&worker_id) {
            return Err(RegistryError::DuplicateWorker(worker_id));
        }
        let descriptor = CapabilityDescriptor::new(worker_id.clone(), summary)?;
        self.descriptors.push(descriptor);
        self.handles.insert(worker_id, handle);
        Ok(self)
    }

    /// Builder form of [`CapabilityCatalog::register`].
    ///
    /// # Errors
    ///
    /// See [`CapabilityCatalog::register`].
    pub fn with_worker(
        mut self,
        id: impl AsRef<str>,
        handle: Arc<dyn Worker>,
        summary: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        self.register(id, handle, summary)?;
        Ok(self)
    }

    /// Returns the descriptors in registration order.
    #[must_use]
    pub fn describe(&self) -> &[CapabilityDescriptor] {
        &self.descriptors
    }

    /// Returns the handle registered for `id`.
    #[must_use]
    pub fn resolve(&self, id: &WorkerId) -> Option<Arc<dyn Worker>> {
        self.handles.get(id).cloned()
    }

    /// Returns whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &WorkerId) -> bool {
        self.handles.contains_key(id)
    }

    /// Returns the number of registered workers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` when no worker is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Builds a catalog restricted to `ids`, in the order given.
    ///
    /// Repeated identifiers are kept once. Identifiers that are not
    /// registered are returned alongside the subset.
    #[must_use]
    pub fn subset<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a WorkerId>,
    ) -> (Self, Vec<WorkerId>) {
        let mut selected = Self::new();
        let mut missing = Vec::new();
        for id in ids {
            if selected.contains(id) {
                continue;
            }
            let entry = self.handles.get(id).and_then(|handle| {
                self.descriptors
                    .iter()
                    .find(|descriptor| descriptor.id() == id)
                    .map(|descriptor| (descriptor.clone(), Arc::clone(handle)))
            });
            let Some((descriptor, handle)) = entry else {
                missing.push(id.clone());
                continue;
            };
            selected.handles.insert(id.clone(), handle);
            selected.descriptors.push(descriptor);
        }
        (selected, missing)
    }
}

impl fmt::Debug for CapabilityCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityCatalog")
            .field("descriptors", &self.descriptors)
            .finish_non_exhaustive()
    }
}
