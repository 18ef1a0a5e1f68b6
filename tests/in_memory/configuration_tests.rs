//! In-memory integration tests for JSON network configuration.

use super::helpers::{Roster, build_network, roster, sink};
use rstest::rstest;
use std::error::Error as _;
use std::sync::Arc;
use switchyard::routing::{
    adapters::memory::{RecordingSink, ScriptedDelegate},
    domain::{ExecuteOptions, RoutingTier, standard_workers},
    services::{NetworkConfig, NetworkConfigError},
};

const SUPPORT_NETWORK: &str = r#"{
    "network_id": "support",
    "expert_ids": ["researchAgent", "generalAgent"],
    "fallback_id": "generalAgent",
    "rules": [
        {"name": "lookup", "target": "researchAgent",
         "condition": {"any_of": [{"starts_with": "Look up"}, {"contains": "sources"}]}}
    ],
    "semantic": {"model": "openai/gpt-5-mini", "extra_instructions": "Prefer research."},
    "tier_timeout_ms": 500
}"#;

#[rstest]
fn configuration_document_is_decoded() {
    let config = NetworkConfig::from_json(SUPPORT_NETWORK).expect("config should parse");

    assert_eq!(config.network_id.as_str(), "support");
    assert_eq!(config.expert_ids.len(), 2);
    assert_eq!(config.rules.len(), 1);
    assert_eq!(config.semantic.model, "openai/gpt-5-mini");
    assert_eq!(config.tier_timeout().map(|limit| limit.as_millis()), Some(500));
}

#[rstest]
fn minimal_document_uses_defaults() {
    let config = NetworkConfig::from_json(r#"{"network_id": "n", "expert_ids": ["generalAgent"]}"#)
        .expect("config should parse");

    assert!(config.fallback_id.is_none());
    assert!(config.rules.is_empty());
    assert!(config.tier_timeout().is_none());
}

#[rstest]
#[case::blank_network(r#"{"network_id": " ", "expert_ids": []}"#)]
#[case::bad_worker(r#"{"network_id": "n", "expert_ids": ["not valid"]}"#)]
#[case::duplicate_rules(r#"{"network_id": "n", "expert_ids": [], "rules": [
    {"name": "a", "target": "x", "condition": {"contains": "a"}},
    {"name": "a", "target": "y", "condition": {"contains": "b"}}]}"#)]
#[case::not_json("network: n")]
fn invalid_documents_are_rejected(#[case] document: &str) {
    assert!(matches!(
        NetworkConfig::from_json(document),
        Err(NetworkConfigError::InvalidDocument(_))
    ));
}

#[rstest]
fn rejected_document_keeps_the_decoder_error() {
    let err = NetworkConfig::from_json("{ \"network_id\": ").expect_err("document is truncated");

    let NetworkConfigError::InvalidDocument(source) = &err else {
        panic!("expected invalid document, got {err:?}");
    };
    assert!(source.is_eof());
    assert!(err.source().is_some());
    assert!(err.to_string().starts_with("invalid network configuration: "));
}

#[rstest]
fn template_failure_exposes_the_render_error() {
    let render = minijinja::Error::new(minijinja::ErrorKind::UndefinedError, "workers is undefined");
    let err = NetworkConfigError::Template(Arc::new(render));

    assert!(err.to_string().starts_with("failed to render routing instructions: "));
    let source = err.source().expect("render error is the source");
    assert!(source.to_string().contains("workers is undefined"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_rules_and_prompt_drive_routing(roster: Roster, sink: RecordingSink) {
    let config = NetworkConfig::from_json(SUPPORT_NETWORK).expect("config should parse");
    let delegate = ScriptedDelegate::selecting(standard_workers::GENERAL);
    let network = build_network(config, &roster, &delegate, &sink).expect("network should build");

    let outcome = network
        .execute("look up the RFC for HTTP caching", ExecuteOptions::new())
        .await
        .expect("routing should succeed");

    assert_eq!(outcome.tier(), RoutingTier::Rule);
    assert_eq!(outcome.selected_worker().as_str(), standard_workers::RESEARCH);
    assert_eq!(network.catalog().len(), 2);
    assert!(network.instructions().contains("Prefer research."));
    assert!(!network.instructions().contains(standard_workers::DEBUGGER));
}

#[rstest]
fn configuration_missing_every_expert_fails_to_build(roster: Roster, sink: RecordingSink) {
    let config = NetworkConfig::from_json(r#"{"network_id": "n", "expert_ids": ["ghostAgent"]}"#)
        .expect("config should parse");

    let result = build_network(config, &roster, &ScriptedDelegate::selecting("x"), &sink);

    assert!(matches!(result, Err(NetworkConfigError::NoValidExperts(_))));
}
