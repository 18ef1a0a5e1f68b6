//! Heterogeneous task input and its normalisation.

use serde_json::{Map, Value};

/// A task as submitted by a caller: free text or a structured payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskInput {
    /// Natural-language task text.
    Text(String),
    /// Structured payload, coerced to compact JSON text before routing.
    Structured(Map<String, Value>),
}

impl TaskInput {
    /// Returns `true` when the payload must be coerced to text.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// Converts the input into the task text handed to workers.
    ///
    /// Text is passed through unchanged. Structured payloads are rendered as
    /// compact JSON with keys in map order.
    #[must_use]
    pub fn into_task_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Structured(payload) => Value::Object(payload).to_string(),
        }
    }
}

impl From<&str> for TaskInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for TaskInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Map<String, Value>> for TaskInput {
    fn from(value: Map<String, Value>) -> Self {
        Self::Structured(value)
    }
}

/// Normalises task text for rule matching: trimmed and lowercased.
#[must_use]
pub fn normalize_for_matching(input: &str) -> String {
    input.trim().to_lowercase()
}
