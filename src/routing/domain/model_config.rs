//! Configuration of the model used by the semantic tier.

use serde::{Deserialize, Serialize};

/// Default model identifier for routing decisions.
const DEFAULT_MODEL: &str = "anthropic/claude-haiku-4.5";

/// Default output budget for a routing decision; the reply is one JSON
/// object.
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 256;

/// Model handle passed to the semantic delegate with each decision request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticModelConfig {
    /// Provider-qualified model identifier.
    pub model: String,
    /// Upper bound on tokens the model may generate for the decision.
    pub max_output_tokens: Option<u32>,
    /// Additional instructions appended to the decision prompt.
    pub extra_instructions: Option<String>,
}

impl Default for SemanticModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            max_output_tokens: Some(DEFAULT_MAX_OUTPUT_TOKENS),
            extra_instructions: None,
        }
    }
}

impl SemanticModelConfig {
    /// Creates a configuration for `model` with default limits.
    #[must_use]
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Appends extra instructions to the decision prompt.
    #[must_use]
    pub fn with_extra_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.extra_instructions = Some(instructions.into());
        self
    }
}
