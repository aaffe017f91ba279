use serde::{Deserialize, Serialize};

use super::help::HelpTopic;

/// One error or warning reported for a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    /// Dotted path of the offending field, when the issue concerns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// How to fix it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<HelpTopic>,
}

impl Issue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
            explanation: None,
            topic: None,
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach a catalog topic; its fix text becomes the explanation
    #[must_use]
    pub fn with_topic(mut self, topic: HelpTopic) -> Self {
        self.explanation = Some(topic.entry().fix.to_string());
        self.topic = Some(topic);
        self
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of validating one candidate
///
/// `score` measures completeness, not correctness: a candidate can score
/// high and still carry structural errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    /// In `[0, 100]`, one decimal place
    pub score: f64,
    /// `errors.is_empty()`
    pub valid: bool,
}

impl ValidationVerdict {
    pub(crate) fn new(errors: Vec<Issue>, warnings: Vec<Issue>, score: f64) -> Self {
        let valid = errors.is_empty();
        Self {
            errors,
            warnings,
            score,
            valid,
        }
    }

    #[must_use]
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|i| i.message.as_str()).collect()
    }

    #[must_use]
    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|i| i.message.as_str()).collect()
    }

    #[must_use]
    pub fn has_error(&self, message: &str) -> bool {
        self.errors.iter().any(|i| i.message == message)
    }
}
