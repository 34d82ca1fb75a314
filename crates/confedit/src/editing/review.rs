use serde::{Deserialize, Serialize};

use crate::validation::FieldError;

/// Decision submitted by an editor reviewing a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Accept,
    Reject,
    Update,
    RequestUpdate,
}

/// Review payload. The comment is mandatory for every action except `accept`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewArgs {
    pub action: ReviewAction,
    #[serde(default)]
    pub comment: String,
}

impl ReviewArgs {
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.action != ReviewAction::Accept && self.comment.is_empty() {
            return Err(FieldError::required("comment"));
        }
        Ok(())
    }
}

/// Submitter's answer to changes an editor asked them to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationAction {
    Accept,
    Reject,
}

/// Confirmation payload; the comment is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmArgs {
    pub action: ConfirmationAction,
    #[serde(default)]
    pub comment: String,
}
