//! Semantic delegate port: the generic network abstraction that performs
//! the routing model call.

use crate::routing::domain::{InvocationContext, SemanticModelConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for semantic delegate calls.
pub type SemanticDelegateResult<T> = Result<T, SemanticDelegateError>;

/// Speaker of a decision message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRole {
    /// The task to route.
    User,
}

/// One message in a decision request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMessage {
    /// Speaker.
    pub role: DecisionRole,
    /// Message text.
    pub content: String,
}

impl DecisionMessage {
    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: DecisionRole::User,
            content: content.into(),
        }
    }
}

/// A single model call asking for one worker selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Model configuration to call.
    pub model: SemanticModelConfig,
    /// Decision instructions listing the catalog.
    pub instructions: String,
    /// Conversation messages, ending with the task.
    pub messages: Vec<DecisionMessage>,
}

/// Model-call contract used by the semantic tier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SemanticDelegate: Send + Sync {
    /// Runs the model with `request.instructions` and returns its raw reply.
    ///
    /// # Errors
    ///
    /// Returns [`SemanticDelegateError`] when the provider call fails.
    async fn generate(
        &self,
        request: &DecisionRequest,
        context: &InvocationContext,
    ) -> SemanticDelegateResult<String>;
}

/// Errors returned by semantic delegate adapters.
#[derive(Debug, Clone, Error)]
pub enum SemanticDelegateError {
    /// The provider rejected the request.
    #[error("model provider rejected the request: {0}")]
    Rejected(String),

    /// Transport or provider runtime failure.
    #[error("model provider error: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl SemanticDelegateError {
    /// Wraps a provider error.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(err))
    }
}
