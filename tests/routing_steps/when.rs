//! When steps for task routing BDD scenarios.

use super::world::{RoutingWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use switchyard::routing::domain::ExecuteOptions;
use tokio_util::sync::CancellationToken;

#[when(r#"the task "{task}" is routed"#)]
fn route_task(world: &mut RoutingWorld, task: String) -> Result<(), eyre::Report> {
    let network = world
        .build_network()
        .wrap_err("build routing network for scenario")?;

    let mut options = ExecuteOptions::new();
    if let Some(thread) = &world.thread_id {
        options = options.with_thread_id(thread.as_str());
    }
    if let Some(delay) = world.cancel_after {
        let token = CancellationToken::new();
        let trigger = token.clone();
        options = options.with_cancellation(token);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trigger.cancel();
        });
    }

    world.last_result = Some(run_async(network.execute(task, options)));
    Ok(())
}
