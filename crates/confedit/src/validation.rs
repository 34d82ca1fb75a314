//! Field-scoped validation failures shared by forms and request payloads.

use serde::Serialize;

/// A validation failure attributed to a single payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    /// The stock "missing field" failure used across forms.
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            message: "This field is required".to_string(),
        }
    }

    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
