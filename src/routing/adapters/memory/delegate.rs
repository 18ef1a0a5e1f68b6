//! Scripted semantic delegate with canned model replies.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::routing::{
    domain::InvocationContext,
    ports::{DecisionRequest, SemanticDelegate, SemanticDelegateError, SemanticDelegateResult},
};

#[derive(Debug, Clone)]
enum Behaviour {
    Reply(String),
    Fail(String),
    Delay(Duration, String),
    Stall,
}

/// Delegate that returns a fixed reply and records every request.
#[derive(Debug, Clone)]
pub struct ScriptedDelegate {
    behaviour: Behaviour,
    requests: Arc<RwLock<Vec<DecisionRequest>>>,
}

impl ScriptedDelegate {
    fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Replies with raw model text.
    #[must_use]
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Reply(reply.into()))
    }

    /// Replies with a well-formed selection of `worker`.
    #[must_use]
    pub fn selecting(worker: &str) -> Self {
        Self::replying(serde_json::json!({ "worker": worker }).to_string())
    }

    /// Fails every call with a provider rejection.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Fail(reason.into()))
    }

    /// Replies with `reply` after `delay`.
    #[must_use]
    pub fn delayed(delay: Duration, reply: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Delay(delay, reply.into()))
    }

    /// Never completes.
    #[must_use]
    pub fn stalling() -> Self {
        Self::with_behaviour(Behaviour::Stall)
    }

    /// Returns the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<DecisionRequest> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl SemanticDelegate for ScriptedDelegate {
    async fn generate(
        &self,
        request: &DecisionRequest,
        _context: &InvocationContext,
    ) -> SemanticDelegateResult<String> {
        self.requests
            .write()
            .map_err(|err| SemanticDelegateError::provider(std::io::Error::other(err.to_string())))?
            .push(request.clone());

        match &self.behaviour {
            Behaviour::Reply(reply) => Ok(reply.clone()),
            Behaviour::Fail(reason) => Err(SemanticDelegateError::Rejected(reason.clone())),
            Behaviour::Delay(delay, reply) => {
                tokio::time::sleep(*delay).await;
                Ok(reply.clone())
            }
            Behaviour::Stall => std::future::pending().await,
        }
    }
}
