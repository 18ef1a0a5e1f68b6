//! Model-based router used when no rule matches.
//!
//! The tier asks the semantic delegate for exactly one worker, validates the
//! reply against the live catalog, and executes the chosen worker. Selection
//! and execution form one step from the caller's point of view. The tier
//! never retries and never substitutes the fallback on its own; every
//! failure is returned for the engine to handle.

use crate::routing::{
    domain::{
        DecisionParseError, InvocationContext, NetworkId, SemanticDecision, SemanticModelConfig,
        WorkerId, WorkerOutput,
    },
    ports::{DecisionMessage, DecisionRequest, SemanticDelegate, SemanticDelegateError, WorkerError},
    services::CapabilityCatalog,
};
use minijinja::Environment;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const DECISION_TEMPLATE: &str = "\
You are the routing coordinator for the \"{{ network_id }}\" network.
Select exactly one worker to handle the user's task.

Available workers:
{% for worker in workers %}- {{ worker.id }}: {{ worker.summary }}
{% endfor %}
Rules:
1. Choose exactly one worker from the list above, using its identifier verbatim.
2. Do not plan multiple steps, chain workers, or split the task; this is a single dispatch.
3. If no worker is a strong match, choose \"{{ fallback_id }}\".
4. Do not answer the task yourself.
{% if extra_instructions %}
{{ extra_instructions }}
{% endif %}
Reply with a single JSON object and nothing else: {\"worker\": \"<worker id>\"}
";

/// Errors surfaced by the semantic tier.
#[derive(Debug, Clone, Error)]
pub enum SemanticTierError {
    /// The delegate's model call failed.
    #[error(transparent)]
    Delegate(#[from] SemanticDelegateError),

    /// The model reply could not be read as a decision.
    #[error("malformed worker selection: {reason}")]
    MalformedSelection {
        /// Why parsing failed.
        reason: DecisionParseError,
        /// The raw model reply.
        reply: String,
    },

    /// The model answered the task itself instead of selecting a worker.
    #[error("model answered directly instead of selecting a worker")]
    NoWorkerSelected,

    /// The model named a worker that is not in the catalog.
    #[error("model selected unknown worker '{0}'")]
    UnknownWorker(String),

    /// The selected worker failed.
    #[error("selected worker {worker} failed: {source}")]
    Worker {
        /// The selected worker.
        worker: WorkerId,
        /// The worker's error.
        source: WorkerError,
    },
}

impl SemanticTierError {
    /// Returns the worker the failure is attributed to, if one was selected.
    #[must_use]
    pub const fn worker(&self) -> Option<&WorkerId> {
        match self {
            Self::Worker { worker, .. } => Some(worker),
            _ => None,
        }
    }
}

/// A worker selected and executed by the semantic tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticSelection {
    /// The selected worker.
    pub worker: WorkerId,
    /// The worker's output.
    pub output: WorkerOutput,
}

/// Thin adapter over a [`SemanticDelegate`] that turns one model call into
/// one worker execution.
pub struct SemanticTier<D>
where
    D: SemanticDelegate,
{
    catalog: Arc<CapabilityCatalog>,
    model: SemanticModelConfig,
    instructions: String,
    delegate: Arc<D>,
}

impl<D> SemanticTier<D>
where
    D: SemanticDelegate,
{
    /// Creates the tier and renders its decision instructions.
    ///
    /// The catalog is immutable, so the instructions are rendered once.
    ///
    /// # Errors
    ///
    /// Returns [`minijinja::Error`] when the instructions fail to render.
    pub fn new(
        network_id: &NetworkId,
        catalog: Arc<CapabilityCatalog>,
        fallback_id: &WorkerId,
        model: SemanticModelConfig,
        delegate: Arc<D>,
    ) -> Result<Self, minijinja::Error> {
        let instructions = render_instructions(network_id, &catalog, fallback_id, &model)?;
        Ok(Self {
            catalog,
            model,
            instructions,
            delegate,
        })
    }

    /// Returns the rendered decision instructions.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Asks the delegate for one worker and validates the reply against the
    /// catalog without executing anything.
    ///
    /// # Errors
    ///
    /// Returns [`SemanticTierError`] when the model call fails or the reply
    /// is malformed or names no registered worker.
    pub async fn select(
        &self,
        task: &str,
        context: &InvocationContext,
    ) -> Result<WorkerId, SemanticTierError> {
        let request = DecisionRequest {
            model: self.model.clone(),
            instructions: self.instructions.clone(),
            messages: vec![DecisionMessage::user(task)],
        };
        let reply = self.delegate.generate(&request, context).await?;
        let worker = self.validate(&reply)?;
        debug!(worker = %worker, "semantic tier selected worker");
        Ok(worker)
    }

    /// Selects a worker for `task` with one model call and executes it.
    ///
    /// # Errors
    ///
    /// Returns [`SemanticTierError`] when the model call fails, the reply is
    /// malformed or names no registered worker, or the worker fails.
    pub async fn route(
        &self,
        task: &str,
        context: &InvocationContext,
    ) -> Result<SemanticSelection, SemanticTierError> {
        let worker = self.select(task, context).await?;
        let handle = self
            .catalog
            .resolve(&worker)
            .ok_or_else(|| SemanticTierError::UnknownWorker(worker.to_string()))?;
        let output = handle
            .execute(task, context)
            .await
            .map_err(|source| SemanticTierError::Worker {
                worker: worker.clone(),
                source,
            })?;
        Ok(SemanticSelection { worker, output })
    }

    /// Validates the model's reply against the live catalog.
    fn validate(&self, reply: &str) -> Result<WorkerId, SemanticTierError> {
        let decision =
            SemanticDecision::parse(reply).map_err(|reason| SemanticTierError::MalformedSelection {
                reason,
                reply: reply.to_owned(),
            })?;
        let name = match decision {
            SemanticDecision::Worker(name) => name,
            SemanticDecision::Response(_) => return Err(SemanticTierError::NoWorkerSelected),
        };
        WorkerId::new(name.as_str())
            .ok()
            .filter(|id| self.catalog.contains(id))
            .ok_or(SemanticTierError::UnknownWorker(name))
    }
}

fn render_instructions(
    network_id: &NetworkId,
    catalog: &CapabilityCatalog,
    fallback_id: &WorkerId,
    model: &SemanticModelConfig,
) -> Result<String, minijinja::Error> {
    let workers: Vec<Value> = catalog
        .describe()
        .iter()
        .map(|descriptor| json!({ "id": descriptor.id().as_str(), "summary": descriptor.summary() }))
        .collect();

    let mut context = Map::new();
    context.insert(
        "network_id".to_owned(),
        Value::String(network_id.as_str().to_owned()),
    );
    context.insert("workers".to_owned(), Value::Array(workers));
    context.insert(
        "fallback_id".to_owned(),
        Value::String(fallback_id.as_str().to_owned()),
    );
    context.insert(
        "extra_instructions".to_owned(),
        model
            .extra_instructions
            .as_ref()
            .map_or(Value::Null, |text| Value::String(text.clone())),
    );

    Environment::new().render_str(DECISION_TEMPLATE, context)
}
