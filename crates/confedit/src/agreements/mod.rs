//! Guest agreement forms.
//!
//! Two submission shapes exist: the person answers the agreement themselves, or
//! an organizer uploads a signed document and records the answer on their
//! behalf. Both reject the submission unless every required field is present.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::validation::FieldError;

/// The binary choice captured by every agreement form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementAnswer {
    Agree,
    Disagree,
}

/// Reference to an uploaded signed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub filename: String,
    pub size: u64,
}

/// Form used when the person answers the agreement themselves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgreementForm {
    #[serde(default)]
    pub answer: Option<AgreementAnswer>,
}

impl AgreementForm {
    pub fn validate(&self) -> Result<AgreementAnswer, Vec<FieldError>> {
        match self.answer {
            Some(answer) => Ok(answer),
            None => Err(vec![FieldError::required("answer")]),
        }
    }
}

/// Form used when an organizer records somebody else's signed answer. The
/// document must clearly show the answer, and the preparer must acknowledge
/// they are signing on behalf of someone else.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgreementUploadForm {
    #[serde(default)]
    pub document: Option<UploadedDocument>,
    #[serde(default)]
    pub answer: Option<AgreementAnswer>,
    #[serde(default)]
    pub upload_confirm: bool,
    #[serde(default)]
    pub understand: bool,
}

/// Validated outcome of an upload-form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementSubmission {
    pub answer: AgreementAnswer,
    pub document: UploadedDocument,
}

impl AgreementUploadForm {
    /// Every field is mandatory; one error is reported per missing field.
    pub fn validate(&self) -> Result<AgreementSubmission, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.document.is_none() {
            errors.push(FieldError::required("document"));
        }
        if self.answer.is_none() {
            errors.push(FieldError::required("answer"));
        }
        if !self.upload_confirm {
            errors.push(FieldError::required("upload_confirm"));
        }
        if !self.understand {
            errors.push(FieldError::required("understand"));
        }

        match (self.document.clone(), self.answer) {
            (Some(document), Some(answer)) if errors.is_empty() => {
                Ok(AgreementSubmission { answer, document })
            }
            _ => Err(errors),
        }
    }
}

/// Router exposing the agreement submission endpoints.
pub fn agreement_router() -> Router {
    Router::new()
        .route("/api/v1/agreements/:agreement_id/respond", post(respond_handler))
        .route("/api/v1/agreements/:agreement_id/upload", post(upload_handler))
}

async fn respond_handler(
    Path(agreement_id): Path<u64>,
    Json(form): Json<AgreementForm>,
) -> Response {
    match form.validate() {
        Ok(answer) => (
            StatusCode::OK,
            Json(json!({
                "agreement_id": agreement_id,
                "answer": answer,
                "uploaded": false,
            })),
        )
            .into_response(),
        Err(fields) => validation_failure(fields),
    }
}

async fn upload_handler(
    Path(agreement_id): Path<u64>,
    Json(form): Json<AgreementUploadForm>,
) -> Response {
    match form.validate() {
        Ok(submission) => (
            StatusCode::OK,
            Json(json!({
                "agreement_id": agreement_id,
                "answer": submission.answer,
                "uploaded": true,
                "document": submission.document,
            })),
        )
            .into_response(),
        Err(fields) => validation_failure(fields),
    }
}

fn validation_failure(fields: Vec<FieldError>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "error": "validation failed",
            "fields": fields,
        })),
    )
        .into_response()
}
