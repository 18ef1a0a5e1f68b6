//! Then steps for task routing BDD scenarios.

use super::world::RoutingWorld;
use rstest_bdd_macros::then;
use switchyard::routing::{
    domain::{RoutingStage, RoutingTier},
    services::RoutingError,
};

#[then(r#"the task is answered by "{worker}" in the {tier} tier"#)]
fn answered_by(world: &RoutingWorld, worker: String, tier: String) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    let expected_tier = RoutingTier::try_from(tier.as_str())?;
    if outcome.selected_worker().as_str() != worker {
        return Err(eyre::eyre!(
            "expected worker {worker}, got {}",
            outcome.selected_worker()
        ));
    }
    if outcome.tier() != expected_tier {
        return Err(eyre::eyre!(
            "expected {expected_tier} tier, got {}",
            outcome.tier()
        ));
    }
    let expected_text = format!("{worker} answered");
    if outcome.result().as_text() != expected_text {
        return Err(eyre::eyre!(
            "expected output '{expected_text}', got '{}'",
            outcome.result().as_text()
        ));
    }
    Ok(())
}

#[then("the model was consulted {count:usize} times")]
fn model_consulted(world: &RoutingWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.delegate.request_count();
    if actual != count {
        return Err(eyre::eyre!("expected {count} model calls, got {actual}"));
    }
    Ok(())
}

#[then(r#"the worker "{worker}" ran {count:usize} times"#)]
fn worker_ran(world: &RoutingWorld, worker: String, count: usize) -> Result<(), eyre::Report> {
    let actual = world.worker(&worker)?.call_count();
    if actual != count {
        return Err(eyre::eyre!("expected {worker} to run {count} times, got {actual}"));
    }
    Ok(())
}

#[then("the fallthrough records a semantic tier failure")]
fn fallthrough_records_semantic_failure(world: &RoutingWorld) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    match outcome.fallthrough() {
        [failure] if failure.tier() == RoutingTier::Semantic => Ok(()),
        other => Err(eyre::eyre!("expected one semantic failure, got {other:?}")),
    }
}

#[then(r#"the fallthrough reason is "{reason}""#)]
fn fallthrough_reason(world: &RoutingWorld, reason: String) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    let failure = outcome
        .fallthrough()
        .first()
        .ok_or_else(|| eyre::eyre!("expected a fallthrough entry"))?;
    if failure.reason() != reason {
        return Err(eyre::eyre!(
            "expected reason '{reason}', got '{}'",
            failure.reason()
        ));
    }
    Ok(())
}

#[then(r#"routing fails mentioning "{first}" and "{second}""#)]
fn routing_fails_mentioning(
    world: &RoutingWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let Some(Err(err @ RoutingError::Exhausted { .. })) = &world.last_result else {
        return Err(eyre::eyre!(
            "expected exhausted routing, got {:?}",
            world.last_result
        ));
    };
    let message = err.to_string();
    if !message.contains(&first) || !message.contains(&second) {
        return Err(eyre::eyre!(
            "expected '{message}' to mention '{first}' and '{second}'"
        ));
    }
    Ok(())
}

#[then("the outcome carries a generated thread identifier")]
fn generated_thread_identifier(world: &RoutingWorld) -> Result<(), eyre::Report> {
    let thread = world.outcome()?.context().thread_id().as_str();
    uuid::Uuid::parse_str(thread)
        .map_err(|err| eyre::eyre!("thread '{thread}' is not a generated identifier: {err}"))?;
    Ok(())
}

#[then(r#"the outcome thread is "{thread}""#)]
fn outcome_thread(world: &RoutingWorld, thread: String) -> Result<(), eyre::Report> {
    let actual = world.outcome()?.context().thread_id().as_str();
    if actual != thread {
        return Err(eyre::eyre!("expected thread {thread}, got {actual}"));
    }
    Ok(())
}

#[then(r#"routing is cancelled during "{stage}""#)]
fn routing_cancelled(world: &RoutingWorld, stage: String) -> Result<(), eyre::Report> {
    let expected = RoutingStage::try_from(stage.as_str())?;
    match &world.last_result {
        Some(Err(RoutingError::Cancelled { stage: actual })) if *actual == expected => Ok(()),
        other => Err(eyre::eyre!("expected cancellation during {expected}, got {other:?}")),
    }
}
