//! Capability descriptors shown to the semantic tier.

use super::{RoutingDomainError, WorkerId};
use serde::{Deserialize, Serialize};

/// A worker identifier plus a short summary of what the worker can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    id: WorkerId,
    summary: String,
}

impl CapabilityDescriptor {
    /// Creates a descriptor with a trimmed, non-empty summary.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::EmptySummary`] when the summary is blank.
    pub fn new(id: WorkerId, summary: impl Into<String>) -> Result<Self, RoutingDomainError> {
        let trimmed = summary.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(RoutingDomainError::EmptySummary(id.to_string()));
        }
        Ok(Self {
            id,
            summary: trimmed,
        })
    }

    /// Returns the worker identifier.
    #[must_use]
    pub const fn id(&self) -> &WorkerId {
        &self.id
    }

    /// Returns the capability summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }
}
