//! In-memory integration tests for concurrent requests on one network.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use super::helpers::{Roster, build_network, roster_with, sink, standard_config};
use rstest::rstest;
use switchyard::routing::{
    adapters::memory::{RecordingSink, ScriptedDelegate, ScriptedWorker},
    domain::{ExecuteOptions, RoutingTier, standard_workers},
};
use tokio::task::JoinSet;

fn slow_roster() -> Roster {
    roster_with(vec![
        (
            standard_workers::DEBUGGER,
            ScriptedWorker::delayed(Duration::from_millis(10), "debuggerAgent answered"),
        ),
        (
            standard_workers::RESEARCH,
            ScriptedWorker::delayed(Duration::from_millis(10), "researchAgent answered"),
        ),
    ])
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_keep_their_own_context(sink: RecordingSink) {
    let roster = slow_roster();
    let delegate = ScriptedDelegate::selecting(standard_workers::RESEARCH);
    let network = Arc::new(
        build_network(standard_config(), &roster, &delegate, &sink).expect("network should build"),
    );

    let mut requests = JoinSet::new();
    for index in 0..16_usize {
        let shared = Arc::clone(&network);
        requests.spawn(async move {
            let task = if index < 8 {
                "debug this function"
            } else {
                "what is new in the ecosystem?"
            };
            let thread = format!("thread-{index}");
            let outcome = shared
                .execute(task, ExecuteOptions::new().with_thread_id(thread.as_str()))
                .await
                .expect("routing should succeed");
            (index, thread, outcome)
        });
    }

    let mut threads = HashSet::new();
    while let Some(joined) = requests.join_next().await {
        let (index, thread, outcome) = joined.expect("request task should not panic");
        assert_eq!(outcome.context().thread_id().as_str(), thread);
        let expected_tier = if index < 8 {
            RoutingTier::Rule
        } else {
            RoutingTier::Semantic
        };
        assert_eq!(outcome.tier(), expected_tier);
        threads.insert(thread);
    }

    assert_eq!(threads.len(), 16);
    assert_eq!(roster.worker(standard_workers::DEBUGGER).call_count(), 8);
    assert_eq!(roster.worker(standard_workers::RESEARCH).call_count(), 8);
    assert_eq!(delegate.request_count(), 8);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn synthesised_threads_are_distinct_across_requests(sink: RecordingSink) {
    let roster = roster_with(Vec::new());
    let delegate = ScriptedDelegate::selecting(standard_workers::GENERAL);
    let network = Arc::new(
        build_network(standard_config(), &roster, &delegate, &sink).expect("network should build"),
    );

    let mut requests = JoinSet::new();
    for _ in 0..8 {
        let shared = Arc::clone(&network);
        requests.spawn(async move {
            shared
                .execute("debug this function", ExecuteOptions::new())
                .await
                .expect("routing should succeed")
                .context()
                .thread_id()
                .clone()
        });
    }

    let mut threads = HashSet::new();
    while let Some(joined) = requests.join_next().await {
        threads.insert(joined.expect("request task should not panic"));
    }
    assert_eq!(threads.len(), 8);
}
