//! Execution engine: the tiered routing state machine.
//!
//! One request moves through [`RoutingStage`]s strictly in the order
//! rule, semantic, fallback, awaiting each tier before considering the
//! next. Tier failures become fallthrough; only a failing fallback worker
//! or a caller cancellation ends the request with an error.

use crate::routing::{
    domain::{
        ExecuteOptions, InvocationContext, NetworkId, OutcomeParts, RoutingOutcome, RoutingStage,
        RoutingTier, TaskInput, TierFailure, WorkerId, WorkerOutput,
    },
    ports::{ObservabilitySink, SemanticDelegate, SpanAttributes, SpanHandle, SpanStatus},
    services::{
        CapabilityCatalog, FallbackWorker, NetworkConfig, NetworkConfigError, RuleMatch, RuleTier,
        SemanticTier, SemanticTierError, WorkerRegistry,
    },
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const RULE_SPAN: &str = "routing.rule_tier";
const WORKER_SPAN: &str = "routing.worker";
const SEMANTIC_SPAN: &str = "routing.semantic_tier";
const FALLBACK_SPAN: &str = "routing.fallback";

/// Errors that end a routing request without a result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// The caller cancelled the request; no further tier was attempted.
    #[error("routing cancelled during {stage}")]
    Cancelled {
        /// Stage that was in flight.
        stage: RoutingStage,
    },

    /// Every tier failed, including the fallback worker.
    #[error("{cause}; fallback worker {fallback} could not recover: {reason}")]
    Exhausted {
        /// The failure that sent the request to the fallback.
        cause: String,
        /// The fallback worker.
        fallback: WorkerId,
        /// The fallback worker's own failure.
        reason: String,
    },
}

/// Result type for routing requests.
pub type RoutingResult<T> = Result<T, RoutingError>;

/// Routes each task to exactly one worker through rule, semantic and
/// fallback tiers.
///
/// The network holds only read-only state after construction, so one
/// instance behind an [`Arc`] serves concurrent requests without locking.
pub struct RoutingNetwork<D, O, K>
where
    D: SemanticDelegate,
    O: ObservabilitySink,
    K: Clock + Send + Sync,
{
    network_id: NetworkId,
    catalog: Arc<CapabilityCatalog>,
    rule_tier: RuleTier,
    semantic_tier: SemanticTier<D>,
    fallback: FallbackWorker,
    tier_timeout: Option<Duration>,
    sink: Arc<O>,
    clock: Arc<K>,
}

/// Engine state carrying the data each stage needs.
enum Step {
    Start(TaskInput),
    RuleAttempt(String),
    WorkerExec { task: String, worker: WorkerId },
    SemanticAttempt(String),
    FallbackAttempt { task: String, cause: TierFailure },
    Done {
        worker: WorkerId,
        tier: RoutingTier,
        output: WorkerOutput,
    },
    Fail(RoutingError),
}

impl Step {
    const fn stage(&self) -> RoutingStage {
        match self {
            Self::Start(_) => RoutingStage::Start,
            Self::RuleAttempt(_) => RoutingStage::RuleAttempt,
            Self::WorkerExec { .. } => RoutingStage::WorkerExec,
            Self::SemanticAttempt(_) => RoutingStage::SemanticAttempt,
            Self::FallbackAttempt { .. } => RoutingStage::FallbackAttempt,
            Self::Done { .. } => RoutingStage::Done,
            Self::Fail(_) => RoutingStage::Fail,
        }
    }
}

/// Result of one guarded tier call.
enum Attempt<T, E> {
    Completed(Result<T, E>),
    TimedOut(Duration),
    Cancelled,
}

/// Per-request bookkeeping.
struct RequestRun {
    context: InvocationContext,
    cancellation: Option<CancellationToken>,
    stages: Vec<RoutingStage>,
    fallthrough: Vec<TierFailure>,
}

impl RequestRun {
    fn enter(&mut self, stage: RoutingStage) {
        debug_assert!(
            self.stages
                .last()
                .is_none_or(|previous| previous.can_transition_to(stage)),
            "illegal routing transition to {stage}"
        );
        self.stages.push(stage);
    }
}

impl<D, O, K> RoutingNetwork<D, O, K>
where
    D: SemanticDelegate,
    O: ObservabilitySink,
    K: Clock + Send + Sync,
{
    /// Builds and validates a network.
    ///
    /// Expert identifiers that are not registered are skipped with a
    /// warning. When no fallback is configured the first resolved expert is
    /// used. The fallback is always part of the network's catalog.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkConfigError::EmptyRegistry`] when `registry` is
    /// empty, [`NetworkConfigError::NoValidExperts`] when no expert resolves,
    /// [`NetworkConfigError::InvalidFallback`] when the fallback is not
    /// registered, or [`NetworkConfigError::Template`] when the decision
    /// prompt cannot be rendered.
    pub fn new(
        config: NetworkConfig,
        registry: &WorkerRegistry,
        delegate: Arc<D>,
        sink: Arc<O>,
        clock: Arc<K>,
    ) -> Result<Self, NetworkConfigError> {
        if registry.is_empty() {
            return Err(NetworkConfigError::EmptyRegistry);
        }

        let tier_timeout = config.tier_timeout();
        let NetworkConfig {
            network_id,
            expert_ids,
            fallback_id: configured_fallback,
            rules,
            semantic,
            ..
        } = config;

        let (experts, missing) = registry.subset(&expert_ids);
        for id in &missing {
            warn!(network = %network_id, worker = %id, "expert is not registered; skipping");
        }
        let first_expert = experts
            .describe()
            .first()
            .map(|descriptor| descriptor.id().clone())
            .ok_or_else(|| NetworkConfigError::NoValidExperts(network_id.clone()))?;

        let fallback_id = configured_fallback.unwrap_or(first_expert);
        if !registry.contains(&fallback_id) {
            return Err(NetworkConfigError::InvalidFallback(fallback_id));
        }

        let member_ids: Vec<WorkerId> = experts
            .describe()
            .iter()
            .map(|descriptor| descriptor.id().clone())
            .chain(std::iter::once(fallback_id.clone()))
            .collect();
        let (members, _) = registry.subset(&member_ids);
        let catalog = Arc::new(members);

        let fallback = FallbackWorker::resolve(&catalog, &fallback_id)
            .ok_or_else(|| NetworkConfigError::InvalidFallback(fallback_id.clone()))?;
        let semantic_tier =
            SemanticTier::new(&network_id, Arc::clone(&catalog), &fallback_id, semantic, delegate)
                .map_err(|err| NetworkConfigError::Template(Arc::new(err)))?;
        let rule_tier = RuleTier::new(rules, Arc::clone(&catalog));

        info!(
            network = %network_id,
            workers = catalog.len(),
            rules = rule_tier.rules().len(),
            fallback = %fallback_id,
            "routing network ready"
        );

        Ok(Self {
            network_id,
            catalog,
            rule_tier,
            semantic_tier,
            fallback,
            tier_timeout,
            sink,
            clock,
        })
    }

    /// Returns the network identifier.
    #[must_use]
    pub const fn network_id(&self) -> &NetworkId {
        &self.network_id
    }

    /// Returns the workers this network routes between.
    #[must_use]
    pub fn catalog(&self) -> &CapabilityCatalog {
        &self.catalog
    }

    /// Returns the fallback worker's identifier.
    #[must_use]
    pub const fn fallback_id(&self) -> &WorkerId {
        self.fallback.id()
    }

    /// Returns the rendered semantic decision instructions.
    #[must_use]
    pub fn instructions(&self) -> &str {
        self.semantic_tier.instructions()
    }

    /// Previews the rule tier's decision without executing anything.
    #[must_use]
    pub fn explain(&self, input: &str) -> Option<RuleMatch> {
        self.rule_tier.explain(input)
    }

    /// Routes one task to exactly one worker and returns its result.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Cancelled`] when the caller's cancellation
    /// token fires, or [`RoutingError::Exhausted`] when the fallback worker
    /// fails after an earlier tier failed or abstained.
    pub async fn execute(
        &self,
        input: impl Into<TaskInput>,
        options: ExecuteOptions,
    ) -> RoutingResult<RoutingOutcome> {
        let mut run = RequestRun {
            context: InvocationContext::resolve(&self.network_id, &options),
            cancellation: options.cancellation().cloned(),
            stages: Vec::new(),
            fallthrough: Vec::new(),
        };

        let mut step = Step::Start(input.into());
        loop {
            run.enter(step.stage());
            step = match step {
                Step::Start(input) => Step::RuleAttempt(self.normalize_input(input, &run)),
                Step::RuleAttempt(task) => self.rule_attempt(&run, task),
                Step::WorkerExec { task, worker } => self.worker_exec(&run, task, worker).await?,
                Step::SemanticAttempt(task) => self.semantic_attempt(&run, task).await?,
                Step::FallbackAttempt { task, cause } => {
                    run.fallthrough.push(cause.clone());
                    self.fallback_attempt(&run, &task, &cause).await?
                }
                Step::Done {
                    worker,
                    tier,
                    output,
                } => return Ok(self.finish(run, worker, tier, output)),
                Step::Fail(err) => {
                    error!(
                        network = %self.network_id,
                        thread = %run.context.thread_id(),
                        error = %err,
                        "routing failed in every tier"
                    );
                    return Err(err);
                }
            };
        }
    }

    fn normalize_input(&self, input: TaskInput, run: &RequestRun) -> String {
        if input.is_structured() {
            info!(
                network = %self.network_id,
                thread = %run.context.thread_id(),
                "coercing structured task payload to JSON text"
            );
        }
        input.into_task_text()
    }

    fn rule_attempt(&self, run: &RequestRun, task: String) -> Step {
        let span = self.open_span(RULE_SPAN, run, RoutingTier::Rule, None);
        let Some(matched) = self.rule_tier.explain(&task) else {
            self.close_span(span, SpanStatus::Skipped, None);
            debug!(network = %self.network_id, "no routing rule matched");
            return Step::SemanticAttempt(task);
        };

        self.close_span(span, SpanStatus::Ok, None);
        debug!(
            network = %self.network_id,
            rule = %matched.rule,
            worker = %matched.target,
            "rule tier selected worker"
        );
        Step::WorkerExec {
            task,
            worker: matched.target,
        }
    }

    async fn worker_exec(
        &self,
        run: &RequestRun,
        task: String,
        worker: WorkerId,
    ) -> RoutingResult<Step> {
        let Some(handle) = self.catalog.resolve(&worker) else {
            let cause = TierFailure::new(RoutingTier::Rule, Some(worker), "worker is not registered");
            return Ok(Step::FallbackAttempt { task, cause });
        };

        let span = self.open_span(WORKER_SPAN, run, RoutingTier::Rule, Some(&worker));
        let attempt = self.guarded(run, handle.execute(&task, &run.context)).await;
        let reason = match attempt {
            Attempt::Completed(Ok(output)) => {
                self.close_span(span, SpanStatus::Ok, None);
                return Ok(Step::Done {
                    worker,
                    tier: RoutingTier::Rule,
                    output,
                });
            }
            Attempt::Completed(Err(err)) => err.to_string(),
            Attempt::TimedOut(limit) => timeout_reason(limit),
            Attempt::Cancelled => return Err(self.cancelled(span, RoutingStage::WorkerExec)),
        };

        self.close_span(span, SpanStatus::Error, Some(&reason));
        warn!(
            network = %self.network_id,
            worker = %worker,
            reason = %reason,
            "rule-selected worker failed; falling back"
        );
        let cause = TierFailure::new(RoutingTier::Rule, Some(worker), reason);
        Ok(Step::FallbackAttempt { task, cause })
    }

    async fn semantic_attempt(&self, run: &RequestRun, task: String) -> RoutingResult<Step> {
        let deadline = self.deadline();
        let decision_span = self.open_span(SEMANTIC_SPAN, run, RoutingTier::Semantic, None);
        let decision = self
            .guarded_until(run, deadline, self.semantic_tier.select(&task, &run.context))
            .await;
        let worker = match decision {
            Attempt::Completed(Ok(worker)) => worker,
            Attempt::Completed(Err(err)) => {
                let cause = TierFailure::new(RoutingTier::Semantic, None, err.to_string());
                return Ok(self.semantic_fallthrough(decision_span, task, cause));
            }
            Attempt::TimedOut(limit) => {
                let cause = TierFailure::new(RoutingTier::Semantic, None, timeout_reason(limit));
                return Ok(self.semantic_fallthrough(decision_span, task, cause));
            }
            Attempt::Cancelled => {
                return Err(self.cancelled(decision_span, RoutingStage::SemanticAttempt));
            }
        };
        self.close_span(decision_span, SpanStatus::Ok, None);

        let Some(handle) = self.catalog.resolve(&worker) else {
            let cause =
                TierFailure::new(RoutingTier::Semantic, Some(worker), "worker is not registered");
            return Ok(Step::FallbackAttempt { task, cause });
        };
        let worker_span = self.open_span(WORKER_SPAN, run, RoutingTier::Semantic, Some(&worker));
        let execution = self
            .guarded_until(run, deadline, handle.execute(&task, &run.context))
            .await;
        let reason = match execution {
            Attempt::Completed(Ok(output)) => {
                self.close_span(worker_span, SpanStatus::Ok, None);
                return Ok(Step::Done {
                    worker,
                    tier: RoutingTier::Semantic,
                    output,
                });
            }
            Attempt::Completed(Err(source)) => SemanticTierError::Worker {
                worker: worker.clone(),
                source,
            }
            .to_string(),
            Attempt::TimedOut(limit) => timeout_reason(limit),
            Attempt::Cancelled => {
                return Err(self.cancelled(worker_span, RoutingStage::SemanticAttempt));
            }
        };
        let cause = TierFailure::new(RoutingTier::Semantic, Some(worker), reason);
        Ok(self.semantic_fallthrough(worker_span, task, cause))
    }

    fn semantic_fallthrough(&self, span: SpanHandle, task: String, cause: TierFailure) -> Step {
        self.close_span(span, SpanStatus::Error, Some(cause.reason()));
        warn!(
            network = %self.network_id,
            failure = %cause,
            "semantic tier failed; falling back"
        );
        Step::FallbackAttempt { task, cause }
    }

    async fn fallback_attempt(
        &self,
        run: &RequestRun,
        task: &str,
        cause: &TierFailure,
    ) -> RoutingResult<Step> {
        let worker = self.fallback.id().clone();
        let span = self.open_span(FALLBACK_SPAN, run, RoutingTier::Fallback, Some(&worker));
        let attempt = self.guarded(run, self.fallback.execute(task, &run.context)).await;
        let reason = match attempt {
            Attempt::Completed(Ok(output)) => {
                self.close_span(span, SpanStatus::Ok, None);
                return Ok(Step::Done {
                    worker,
                    tier: RoutingTier::Fallback,
                    output,
                });
            }
            Attempt::Completed(Err(err)) => err.to_string(),
            Attempt::TimedOut(limit) => timeout_reason(limit),
            Attempt::Cancelled => return Err(self.cancelled(span, RoutingStage::FallbackAttempt)),
        };

        self.close_span(span, SpanStatus::Error, Some(&reason));
        Ok(Step::Fail(RoutingError::Exhausted {
            cause: cause.to_string(),
            fallback: worker,
            reason,
        }))
    }

    fn finish(
        &self,
        run: RequestRun,
        worker: WorkerId,
        tier: RoutingTier,
        output: WorkerOutput,
    ) -> RoutingOutcome {
        info!(
            network = %self.network_id,
            thread = %run.context.thread_id(),
            tier = %tier,
            worker = %worker,
            fallthrough = run.fallthrough.len(),
            "task routed"
        );
        RoutingOutcome::from_parts(OutcomeParts {
            network_id: self.network_id.clone(),
            selected_worker: worker,
            tier,
            result: output,
            context: run.context,
            fallthrough: run.fallthrough,
            stages: run.stages,
            completed_at: self.clock.utc(),
        })
    }

    /// Runs a tier call under the request's cancellation token and the
    /// configured tier timeout.
    async fn guarded<T, E>(
        &self,
        run: &RequestRun,
        call: impl Future<Output = Result<T, E>>,
    ) -> Attempt<T, E> {
        self.guarded_until(run, self.deadline(), call).await
    }

    /// Like [`Self::guarded`], but against a deadline shared by several calls
    /// of the same tier.
    async fn guarded_until<T, E>(
        &self,
        run: &RequestRun,
        deadline: Option<Instant>,
        call: impl Future<Output = Result<T, E>>,
    ) -> Attempt<T, E> {
        let bounded = async {
            let (Some(limit), Some(at)) = (self.tier_timeout, deadline) else {
                return Attempt::Completed(call.await);
            };
            tokio::time::timeout_at(at, call)
                .await
                .map_or(Attempt::TimedOut(limit), Attempt::Completed)
        };
        let Some(token) = &run.cancellation else {
            return bounded.await;
        };
        tokio::select! {
            biased;
            () = token.cancelled() => Attempt::Cancelled,
            attempt = bounded => attempt,
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.tier_timeout.map(|limit| Instant::now() + limit)
    }

    fn cancelled(&self, span: SpanHandle, stage: RoutingStage) -> RoutingError {
        self.close_span(span, SpanStatus::Cancelled, None);
        info!(network = %self.network_id, stage = %stage, "routing cancelled by caller");
        RoutingError::Cancelled { stage }
    }

    fn open_span(
        &self,
        name: &str,
        run: &RequestRun,
        tier: RoutingTier,
        worker: Option<&WorkerId>,
    ) -> SpanHandle {
        let mut attributes = SpanAttributes::new()
            .with("network_id", &self.network_id)
            .with("thread_id", run.context.thread_id())
            .with("resource_id", run.context.resource_id())
            .with("tier", tier);
        if let Some(id) = worker {
            attributes = attributes.with("worker_id", id);
        }
        self.sink.start_span(name, attributes)
    }

    fn close_span(&self, span: SpanHandle, status: SpanStatus, error: Option<&str>) {
        self.sink.record_outcome(&span, status, error);
        self.sink.end(span);
    }
}

fn timeout_reason(limit: Duration) -> String {
    format!("timed out after {} ms", limit.as_millis())
}
