//! Parsing of the semantic model's routing decision.

use super::DecisionParseError;
use serde::Deserialize;

/// What the semantic model decided.
///
/// The worker name is untrusted: callers must validate it against the live
/// catalog before dispatching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticDecision {
    /// The model selected one worker by identifier.
    Worker(String),
    /// The model answered directly instead of selecting a worker.
    Response(String),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDecision {
    #[serde(default)]
    worker: Option<String>,
    #[serde(default)]
    response: Option<String>,
}

impl SemanticDecision {
    /// Parses a model reply of the form `{"worker": "<id>"}`.
    ///
    /// The JSON object may be wrapped in prose or a fenced code block; the
    /// outermost braces are used.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionParseError`] when no JSON object is present, the
    /// object has an unexpected shape, or it selects zero or conflicting
    /// answers.
    pub fn parse(reply: &str) -> Result<Self, DecisionParseError> {
        let json = extract_json_object(reply).ok_or(DecisionParseError::MissingJson)?;
        let raw: RawDecision = serde_json::from_str(json)
            .map_err(|err| DecisionParseError::InvalidShape(err.to_string()))?;

        let worker = raw
            .worker
            .map(|w| w.trim().to_owned())
            .filter(|w| !w.is_empty());
        let response = raw.response.filter(|r| !r.trim().is_empty());

        match (worker, response) {
            (Some(_), Some(_)) => Err(DecisionParseError::Ambiguous),
            (Some(worker), None) => Ok(Self::Worker(worker)),
            (None, Some(response)) => Ok(Self::Response(response)),
            (None, None) => Err(DecisionParseError::Empty),
        }
    }
}

fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    reply.get(start..=end)
}
