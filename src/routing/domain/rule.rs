//! Deterministic routing rules evaluated before any model call.
//!
//! A [`RuleSet`] is an ordered list of [`RoutingRule`]s. Evaluation is
//! first-match-wins, so ordering carries meaning: when one rule's trigger is
//! a substring of another's (for example "write documentation" and a generic
//! "write"), the more specific task family must be declared first. Nothing
//! enforces mutual exclusivity between rules; declaration order alone
//! resolves overlaps.

use super::{RoutingDomainError, WorkerId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pattern tree tested against normalised (trimmed, lowercased) input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCondition {
    /// Input contains the needle.
    Contains(String),
    /// Input starts with the needle.
    StartsWith(String),
    /// At least one nested condition holds.
    AnyOf(Vec<MatchCondition>),
    /// Every nested condition holds.
    AllOf(Vec<MatchCondition>),
}

impl MatchCondition {
    /// Matches when the input contains any of the phrases.
    #[must_use]
    pub fn contains_any(phrases: &[&str]) -> Self {
        Self::AnyOf(
            phrases
                .iter()
                .map(|phrase| Self::Contains((*phrase).to_owned()))
                .collect(),
        )
    }

    /// Matches when the input starts with any of the phrases.
    #[must_use]
    pub fn starts_with_any(phrases: &[&str]) -> Self {
        Self::AnyOf(
            phrases
                .iter()
                .map(|phrase| Self::StartsWith((*phrase).to_owned()))
                .collect(),
        )
    }

    /// Evaluates the condition against already-normalised input.
    #[must_use]
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            Self::Contains(needle) => normalized.contains(needle.as_str()),
            Self::StartsWith(needle) => normalized.starts_with(needle.as_str()),
            Self::AnyOf(conditions) => conditions.iter().any(|c| c.matches(normalized)),
            Self::AllOf(conditions) => conditions.iter().all(|c| c.matches(normalized)),
        }
    }

    /// Lowercases and trims every needle so matching is case-insensitive.
    fn normalized(self) -> Self {
        match self {
            Self::Contains(needle) => Self::Contains(needle.trim().to_lowercase()),
            Self::StartsWith(needle) => Self::StartsWith(needle.trim().to_lowercase()),
            Self::AnyOf(conditions) => {
                Self::AnyOf(conditions.into_iter().map(Self::normalized).collect())
            }
            Self::AllOf(conditions) => {
                Self::AllOf(conditions.into_iter().map(Self::normalized).collect())
            }
        }
    }

    /// A condition is empty when it could never test a real pattern.
    fn is_empty(&self) -> bool {
        match self {
            Self::Contains(needle) | Self::StartsWith(needle) => needle.is_empty(),
            Self::AnyOf(conditions) | Self::AllOf(conditions) => {
                conditions.is_empty() || conditions.iter().any(Self::is_empty)
            }
        }
    }
}

/// One rule: a named pure predicate mapping input to a target worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRoutingRule")]
pub struct RoutingRule {
    name: String,
    target: WorkerId,
    condition: MatchCondition,
}

#[derive(Deserialize)]
struct RawRoutingRule {
    name: String,
    target: WorkerId,
    condition: MatchCondition,
}

impl TryFrom<RawRoutingRule> for RoutingRule {
    type Error = RoutingDomainError;

    fn try_from(raw: RawRoutingRule) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.target, raw.condition)
    }
}

impl RoutingRule {
    /// Creates a rule with normalised patterns.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::EmptyRuleName`] for a blank name or
    /// [`RoutingDomainError::EmptyRuleCondition`] when the condition contains
    /// an empty pattern or an empty group.
    pub fn new(
        name: impl Into<String>,
        target: WorkerId,
        condition: MatchCondition,
    ) -> Result<Self, RoutingDomainError> {
        let rule_name = name.into().trim().to_owned();
        if rule_name.is_empty() {
            return Err(RoutingDomainError::EmptyRuleName);
        }
        let normalized = condition.normalized();
        if normalized.is_empty() {
            return Err(RoutingDomainError::EmptyRuleCondition(rule_name));
        }
        Ok(Self {
            name: rule_name,
            target,
            condition: normalized,
        })
    }

    /// Returns the rule name (its task family).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the worker this rule routes to.
    #[must_use]
    pub const fn target(&self) -> &WorkerId {
        &self.target
    }

    /// Returns the rule's condition.
    #[must_use]
    pub const fn condition(&self) -> &MatchCondition {
        &self.condition
    }

    /// Returns the target when the normalised input satisfies the rule.
    #[must_use]
    pub fn evaluate(&self, normalized: &str) -> Option<&WorkerId> {
        self.condition.matches(normalized).then_some(&self.target)
    }
}

/// Ordered, name-unique collection of routing rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<RoutingRule>", into = "Vec<RoutingRule>")]
pub struct RuleSet {
    rules: Vec<RoutingRule>,
}

impl RuleSet {
    /// Creates a rule set, preserving declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::DuplicateRuleName`] when two rules share
    /// a name.
    pub fn new(rules: Vec<RoutingRule>) -> Result<Self, RoutingDomainError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name()) {
                return Err(RoutingDomainError::DuplicateRuleName(rule.name().to_owned()));
            }
        }
        Ok(Self { rules })
    }

    /// Creates a rule set with no rules, so every task goes to the semantic
    /// tier.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Parses a rule set from its JSON form (an array of rules).
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::InvalidRuleSet`] when the JSON is
    /// malformed or any rule fails validation.
    pub fn from_json(json: &str) -> Result<Self, RoutingDomainError> {
        serde_json::from_str(json).map_err(|err| RoutingDomainError::InvalidRuleSet(err.to_string()))
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the distinct worker identifiers targeted by the rules.
    #[must_use]
    pub fn targets(&self) -> Vec<&WorkerId> {
        let mut seen = HashSet::new();
        self.rules
            .iter()
            .map(RoutingRule::target)
            .filter(|target| seen.insert(*target))
            .collect()
    }
}

impl TryFrom<Vec<RoutingRule>> for RuleSet {
    type Error = RoutingDomainError;

    fn try_from(rules: Vec<RoutingRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<RuleSet> for Vec<RoutingRule> {
    fn from(value: RuleSet) -> Self {
        value.rules
    }
}
