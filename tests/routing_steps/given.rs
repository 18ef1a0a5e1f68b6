//! Given steps for task routing BDD scenarios.

use std::time::Duration;

use super::world::RoutingWorld;
use rstest_bdd_macros::given;
use switchyard::routing::{
    adapters::memory::{ScriptedDelegate, ScriptedWorker},
    domain::standard_workers,
};

const STANDARD_ROSTER: [(&str, &str); 8] = [
    (standard_workers::DOCUMENTATION, "Writes documentation and comments"),
    (standard_workers::TESTING, "Writes automated tests"),
    (standard_workers::CODE_REVIEW, "Reviews code changes"),
    (standard_workers::REFACTOR, "Restructures existing code"),
    (standard_workers::DEBUGGER, "Diagnoses and fixes defects"),
    (standard_workers::RESEARCH, "Finds and summarises information"),
    (standard_workers::CODER, "Writes new code"),
    (standard_workers::GENERAL, "Handles anything else"),
];

#[given(r#"the standard worker roster with "{fallback}" as fallback"#)]
fn standard_roster(world: &mut RoutingWorld, fallback: String) {
    for (id, summary) in STANDARD_ROSTER {
        world.roster.push((id.to_owned(), summary.to_owned()));
        world
            .workers
            .insert(id.to_owned(), ScriptedWorker::succeeding(format!("{id} answered")));
    }
    world.fallback = Some(fallback);
}

#[given(r#"the model selects "{worker}""#)]
fn model_selects(world: &mut RoutingWorld, worker: String) {
    world.delegate = ScriptedDelegate::selecting(&worker);
}

#[given(r#"the model replies "{reply}""#)]
fn model_replies(world: &mut RoutingWorld, reply: String) {
    world.delegate = ScriptedDelegate::replying(reply);
}

#[given(r#"the worker "{worker}" fails with "{reason}""#)]
fn worker_fails(world: &mut RoutingWorld, worker: String, reason: String) -> Result<(), eyre::Report> {
    world.worker(&worker)?;
    world.workers.insert(worker, ScriptedWorker::failing(reason));
    Ok(())
}

#[given(r#"the worker "{worker}" never answers"#)]
fn worker_stalls(world: &mut RoutingWorld, worker: String) -> Result<(), eyre::Report> {
    world.worker(&worker)?;
    world.workers.insert(worker, ScriptedWorker::stalling());
    Ok(())
}

#[given(r#"the caller continues thread "{thread}""#)]
fn caller_continues_thread(world: &mut RoutingWorld, thread: String) {
    world.thread_id = Some(thread);
}

#[given("a tier timeout of {millis:u64} milliseconds")]
fn tier_timeout(world: &mut RoutingWorld, millis: u64) {
    world.tier_timeout = Some(Duration::from_millis(millis));
}

#[given("the caller cancels after {millis:u64} milliseconds")]
fn caller_cancels(world: &mut RoutingWorld, millis: u64) {
    world.cancel_after = Some(Duration::from_millis(millis));
}
