//! Deterministic first-pass router.

use crate::routing::{
    domain::{RuleSet, WorkerId, normalize_for_matching},
    services::CapabilityCatalog,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// The rule that decided a routing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Name of the matching rule.
    pub rule: String,
    /// Worker the rule routes to.
    pub target: WorkerId,
}

/// Evaluates an ordered rule set against task text.
///
/// Evaluation is a single pass in declaration order and stops at the first
/// satisfied rule whose target is in the catalog. A satisfied rule whose
/// target is not registered is skipped, so a dangling rule can never
/// produce an unroutable selection. Finding no match is a valid abstention,
/// not an error.
#[derive(Debug, Clone)]
pub struct RuleTier {
    rules: RuleSet,
    catalog: Arc<CapabilityCatalog>,
}

impl RuleTier {
    /// Creates a rule tier over `catalog`.
    ///
    /// Rules targeting workers outside the catalog are reported once here
    /// and skipped during evaluation.
    #[must_use]
    pub fn new(rules: RuleSet, catalog: Arc<CapabilityCatalog>) -> Self {
        for rule in rules.rules() {
            if !catalog.contains(rule.target()) {
                warn!(
                    rule = rule.name(),
                    target = %rule.target(),
                    "routing rule targets an unregistered worker and will be skipped"
                );
            }
        }
        Self { rules, catalog }
    }

    /// Returns the worker selected for `input`, or `None` to abstain.
    ///
    /// This is a pure function of the input and the rule set.
    #[must_use]
    pub fn route(&self, input: &str) -> Option<WorkerId> {
        self.explain(input).map(|matched| matched.target)
    }

    /// Returns the rule that selects a worker for `input`, if any.
    #[must_use]
    pub fn explain(&self, input: &str) -> Option<RuleMatch> {
        let normalized = normalize_for_matching(input);
        for rule in self.rules.rules() {
            let Some(target) = rule.evaluate(&normalized) else {
                continue;
            };
            if !self.catalog.contains(target) {
                warn!(
                    rule = rule.name(),
                    target = %target,
                    "routing rule matched but its target is not registered; continuing"
                );
                continue;
            }
            debug!(rule = rule.name(), target = %target, "routing rule matched");
            return Some(RuleMatch {
                rule: rule.name().to_owned(),
                target: target.clone(),
            });
        }
        None
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
