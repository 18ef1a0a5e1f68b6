//! Built-in rule set for the standard worker roster.
//!
//! Families are listed specific-first: documentation, testing, review and
//! refactoring requests frequently also mention "code" or start with
//! "write", so they precede the debugging family and the generic coding
//! catch-all.

use super::{MatchCondition, RoutingDomainError, RoutingRule, RuleSet, WorkerId};

/// Worker identifiers targeted by [`RuleSet::standard`].
pub mod workers {
    /// Writes and improves documentation, comments and READMEs.
    pub const DOCUMENTATION: &str = "documentationAgent";
    /// Writes and extends automated tests.
    pub const TESTING: &str = "testingAgent";
    /// Reviews code and pull requests.
    pub const CODE_REVIEW: &str = "codeReviewAgent";
    /// Restructures existing code without changing behaviour.
    pub const REFACTOR: &str = "refactorAgent";
    /// Diagnoses and fixes defects.
    pub const DEBUGGER: &str = "debuggerAgent";
    /// Gathers and summarises information.
    pub const RESEARCH: &str = "researchAgent";
    /// Writes new code.
    pub const CODER: &str = "coderAgent";
    /// General-purpose assistant used as the fallback.
    pub const GENERAL: &str = "generalAgent";
}

impl RuleSet {
    /// Returns the built-in rule set for the standard worker roster.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError`] only if a built-in identifier or rule
    /// fails validation.
    pub fn standard() -> Result<Self, RoutingDomainError> {
        Self::new(vec![
            rule(
                "documentation",
                workers::DOCUMENTATION,
                MatchCondition::contains_any(&[
                    "document this",
                    "write documentation",
                    "write docs",
                    "add documentation",
                    "docstring",
                    "add comments",
                    "jsdoc",
                    "readme",
                ]),
            )?,
            rule(
                "testing",
                workers::TESTING,
                MatchCondition::contains_any(&[
                    "write tests",
                    "write a test",
                    "unit test",
                    "integration test",
                    "test case",
                    "test coverage",
                ]),
            )?,
            rule(
                "code_review",
                workers::CODE_REVIEW,
                MatchCondition::contains_any(&[
                    "review this code",
                    "review my code",
                    "code review",
                    "review the pull request",
                    "review this pr",
                ]),
            )?,
            rule(
                "refactoring",
                workers::REFACTOR,
                MatchCondition::AnyOf(vec![
                    MatchCondition::StartsWith("refactor".to_owned()),
                    MatchCondition::contains_any(&[
                        "refactor this",
                        "clean up this code",
                        "simplify this code",
                    ]),
                ]),
            )?,
            rule(
                "debugging",
                workers::DEBUGGER,
                MatchCondition::AllOf(vec![
                    MatchCondition::contains_any(&[
                        "debug",
                        "fix",
                        "bug",
                        "error",
                        "not working",
                        "broken",
                        "crash",
                    ]),
                    MatchCondition::contains_any(&[
                        "code",
                        "function",
                        "script",
                        "program",
                        "stack trace",
                        "exception",
                    ]),
                ]),
            )?,
            rule(
                "research",
                workers::RESEARCH,
                MatchCondition::AnyOf(vec![
                    MatchCondition::starts_with_any(&["research", "look up"]),
                    MatchCondition::contains_any(&[
                        "find information",
                        "search the web",
                        "latest news",
                        "sources on",
                    ]),
                ]),
            )?,
            rule(
                "coding",
                workers::CODER,
                MatchCondition::AnyOf(vec![
                    MatchCondition::starts_with_any(&["write", "implement"]),
                    MatchCondition::contains_any(&["write code", "write a function"]),
                ]),
            )?,
        ])
    }
}

fn rule(
    name: &str,
    target: &str,
    condition: MatchCondition,
) -> Result<RoutingRule, RoutingDomainError> {
    RoutingRule::new(name, WorkerId::new(target)?, condition)
}
