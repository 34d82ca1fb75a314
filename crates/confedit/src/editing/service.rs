use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use super::domain::{
    CommentId, Contribution, ContributionId, Editable, EditableType, EditingFileType,
    EditingRevision, EditingRevisionComment, EditingTag, Event, EventId, FileTypeId,
    FinalRevisionState, InitialRevisionState, RevisionId, User, UserId,
};
use super::repository::{EditableRepository, FileTypeRepository, RepositoryError};
use super::review::{ConfirmArgs, ConfirmationAction, ReviewAction, ReviewArgs};
use crate::validation::FieldError;

/// Arguments accepted by the file type CRUD endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct FileTypeArgs {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub allow_multiple_files: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub publishable: bool,
}

/// Arguments accepted by the comment creation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentArgs {
    pub text: String,
    #[serde(default)]
    pub internal: bool,
}

/// Error raised by the editing service.
#[derive(Debug, thiserror::Error)]
pub enum EditingServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Validation(#[from] FieldError),
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("insufficient permissions")]
    PermissionDenied,
}

/// Service composing the file type registry and editable timeline repositories.
pub struct EditingService<R> {
    repository: Arc<R>,
}

static FILE_TYPE_SEQUENCE: AtomicI64 = AtomicI64::new(1);
static COMMENT_SEQUENCE: AtomicI64 = AtomicI64::new(1);

fn next_file_type_id() -> FileTypeId {
    FileTypeId(FILE_TYPE_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

fn next_comment_id() -> CommentId {
    CommentId(COMMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

impl<R> EditingService<R>
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn event(&self, event_id: EventId) -> Result<Event, EditingServiceError> {
        Ok(self
            .repository
            .event(event_id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    pub fn contribution(
        &self,
        event_id: EventId,
        contribution_id: ContributionId,
    ) -> Result<Contribution, EditingServiceError> {
        Ok(self
            .repository
            .contribution(event_id, contribution_id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    pub fn resolve_user(&self, user_id: UserId) -> Result<Option<User>, EditingServiceError> {
        Ok(self.repository.user(user_id)?)
    }

    pub fn tags(&self, event_id: EventId) -> Result<Vec<EditingTag>, EditingServiceError> {
        Ok(self.repository.tags_for_event(event_id)?)
    }

    pub fn create_file_type(
        &self,
        event_id: EventId,
        args: FileTypeArgs,
    ) -> Result<EditingFileType, EditingServiceError> {
        let args = normalize_file_type_args(args)?;
        let file_type = EditingFileType {
            id: next_file_type_id(),
            event_id,
            name: args.name,
            extensions: args.extensions,
            allow_multiple_files: args.allow_multiple_files,
            required: args.required,
            publishable: args.publishable,
        };
        Ok(self.repository.insert_file_type(file_type)?)
    }

    pub fn update_file_type(
        &self,
        event_id: EventId,
        file_type_id: FileTypeId,
        args: FileTypeArgs,
    ) -> Result<EditingFileType, EditingServiceError> {
        let args = normalize_file_type_args(args)?;
        let mut file_type = self
            .repository
            .file_type(event_id, file_type_id)?
            .ok_or(RepositoryError::NotFound)?;

        file_type.name = args.name;
        file_type.extensions = args.extensions;
        file_type.allow_multiple_files = args.allow_multiple_files;
        file_type.required = args.required;
        file_type.publishable = args.publishable;

        self.repository.update_file_type(file_type.clone())?;
        Ok(file_type)
    }

    pub fn delete_file_type(
        &self,
        event_id: EventId,
        file_type_id: FileTypeId,
    ) -> Result<(), EditingServiceError> {
        Ok(self.repository.delete_file_type(event_id, file_type_id)?)
    }

    pub fn list_file_types(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EditingFileType>, EditingServiceError> {
        let mut file_types = self.repository.file_types_for_event(event_id)?;
        file_types.sort_by_key(|file_type| file_type.id);
        Ok(file_types)
    }

    /// Resolve the editable for a contribution, or `NotFound` when none exists.
    pub fn editable_for(
        &self,
        event_id: EventId,
        contribution_id: ContributionId,
        editable_type: EditableType,
    ) -> Result<Editable, EditingServiceError> {
        Ok(self
            .repository
            .editable_for_contribution(event_id, contribution_id, editable_type)?
            .ok_or(RepositoryError::NotFound)?)
    }

    /// Apply a review decision to the latest revision of an editable.
    ///
    /// `accept` and `reject` close the revision with the matching final state.
    /// `request_update` sends it back to the submitter for changes. `update`
    /// replaces the revision with an editor-amended follow-up the submitter
    /// must confirm. A non-empty review comment is recorded as a system note.
    pub fn review_revision(
        &self,
        event_id: EventId,
        contribution_id: ContributionId,
        editable_type: EditableType,
        revision_id: RevisionId,
        editor: User,
        args: ReviewArgs,
    ) -> Result<Editable, EditingServiceError> {
        args.validate()?;

        let event = self.event(event_id)?;
        let mut editable = self.editable_for(event_id, contribution_id, editable_type)?;

        let assigned = editable
            .editor
            .as_ref()
            .map(|assigned| assigned.id == editor.id)
            .unwrap_or(false);
        if !assigned && !event.can_manage_editing(Some(&editor)) {
            return Err(EditingServiceError::PermissionDenied);
        }

        let next_revision_id = RevisionId(
            editable
                .revisions
                .iter()
                .map(|revision| revision.id.0)
                .max()
                .unwrap_or(0)
                + 1,
        );
        let editable_id = editable.id;

        let Some(revision) = editable.revisions.last_mut() else {
            return Err(EditingServiceError::InvalidState("editable has no revisions"));
        };
        if revision.id != revision_id {
            return Err(EditingServiceError::InvalidState(
                "only the latest revision can be reviewed",
            ));
        }
        if revision.final_state.is_some() {
            return Err(EditingServiceError::InvalidState(
                "revision already has a final state",
            ));
        }

        let now = Utc::now();
        revision.editor = Some(editor.clone());
        if !args.comment.is_empty() {
            revision.comments.push(EditingRevisionComment {
                id: next_comment_id(),
                revision_id: revision.id,
                author: Some(editor.clone()),
                created_dt: now,
                modified_dt: None,
                internal: false,
                system: true,
                text: args.comment.clone(),
            });
        }

        let follow_up = match args.action {
            ReviewAction::Accept => {
                revision.final_state = Some(FinalRevisionState::Accepted);
                None
            }
            ReviewAction::Reject => {
                revision.final_state = Some(FinalRevisionState::Rejected);
                None
            }
            ReviewAction::RequestUpdate => {
                revision.final_state = Some(FinalRevisionState::NeedsSubmitterChanges);
                None
            }
            ReviewAction::Update => {
                revision.final_state = Some(FinalRevisionState::Replaced);
                Some(EditingRevision {
                    id: next_revision_id,
                    editable_id,
                    submitter: revision.submitter.clone(),
                    editor: Some(editor),
                    created_dt: now,
                    comment: args.comment.clone(),
                    files: revision.files.clone(),
                    comments: Vec::new(),
                    tag_ids: revision.tag_ids.clone(),
                    initial_state: InitialRevisionState::NeedsSubmitterConfirmation,
                    final_state: None,
                })
            }
        };

        if let Some(follow_up) = follow_up {
            editable.revisions.push(follow_up);
        }

        self.repository.update_editable(editable.clone())?;
        Ok(editable)
    }

    /// Record the submitter's answer to changes awaiting their confirmation.
    pub fn confirm_revision(
        &self,
        event_id: EventId,
        contribution_id: ContributionId,
        editable_type: EditableType,
        revision_id: RevisionId,
        submitter: User,
        args: ConfirmArgs,
    ) -> Result<Editable, EditingServiceError> {
        let mut editable = self.editable_for(event_id, contribution_id, editable_type)?;

        let Some(revision) = editable
            .revisions
            .iter_mut()
            .find(|revision| revision.id == revision_id)
        else {
            return Err(EditingServiceError::Repository(RepositoryError::NotFound));
        };

        if !revision.awaits_submitter_confirmation() {
            return Err(EditingServiceError::InvalidState(
                "revision is not awaiting submitter confirmation",
            ));
        }
        if revision.submitter.id != submitter.id {
            return Err(EditingServiceError::PermissionDenied);
        }

        if !args.comment.is_empty() {
            revision.comments.push(EditingRevisionComment {
                id: next_comment_id(),
                revision_id: revision.id,
                author: Some(submitter),
                created_dt: Utc::now(),
                modified_dt: None,
                internal: false,
                system: false,
                text: args.comment.clone(),
            });
        }

        revision.final_state = Some(match args.action {
            ConfirmationAction::Accept => FinalRevisionState::Accepted,
            ConfirmationAction::Reject => FinalRevisionState::NeedsSubmitterChanges,
        });

        self.repository.update_editable(editable.clone())?;
        Ok(editable)
    }

    /// Append a comment to a revision on behalf of `author`.
    pub fn create_comment(
        &self,
        event_id: EventId,
        contribution_id: ContributionId,
        editable_type: EditableType,
        revision_id: RevisionId,
        author: User,
        args: CommentArgs,
    ) -> Result<EditingRevisionComment, EditingServiceError> {
        if args.text.is_empty() {
            return Err(EditingServiceError::Validation(FieldError::required("text")));
        }

        let event = self.event(event_id)?;
        let mut editable = self.editable_for(event_id, contribution_id, editable_type)?;

        if !editable.can_comment(Some(&author), &event) {
            return Err(EditingServiceError::PermissionDenied);
        }
        if args.internal && !event.can_manage_editing(Some(&author)) {
            return Err(EditingServiceError::PermissionDenied);
        }

        let Some(revision) = editable
            .revisions
            .iter_mut()
            .find(|revision| revision.id == revision_id)
        else {
            return Err(EditingServiceError::Repository(RepositoryError::NotFound));
        };

        let comment = EditingRevisionComment {
            id: next_comment_id(),
            revision_id,
            author: Some(author),
            created_dt: Utc::now(),
            modified_dt: None,
            internal: args.internal,
            system: false,
            text: args.text,
        };
        revision.comments.push(comment.clone());

        self.repository.update_editable(editable)?;
        Ok(comment)
    }
}

fn normalize_file_type_args(mut args: FileTypeArgs) -> Result<FileTypeArgs, FieldError> {
    if args.name.trim().is_empty() {
        return Err(FieldError::required("name"));
    }
    args.name = args.name.trim().to_string();
    args.extensions = args
        .extensions
        .iter()
        .map(|extension| extension.trim().trim_start_matches('.').to_lowercase())
        .filter(|extension| !extension.is_empty())
        .collect();
    Ok(args)
}
