//! Editing workflow for conference contributions.
//!
//! An [`Editable`](domain::Editable) ties a contribution to a timeline of
//! submitted revisions. Editors review revisions, submitters confirm proposed
//! changes, and everything is exposed through permission-aware serialization
//! views. The per-event file type registry constrains what submitters upload.

pub mod domain;
pub mod pages;
pub mod repository;
pub mod review;
pub mod router;
pub mod service;
pub mod urls;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    CommentId, Contribution, ContributionId, Editable, EditableId, EditableType, EditingFileType,
    EditingRevision, EditingRevisionComment, EditingRevisionFile, EditingTag, Event, EventId,
    FileTypeId, FinalRevisionState, InitialRevisionState, RevisionId, TagId, User, UserId,
};
pub use repository::{EditableRepository, FileTypeRepository, RepositoryError};
pub use review::{ConfirmArgs, ConfirmationAction, ReviewAction, ReviewArgs};
pub use router::editing_router;
pub use service::{CommentArgs, EditingService, EditingServiceError, FileTypeArgs};
pub use urls::EditableTarget;
pub use views::{
    CommentView, ContributionView, EditableView, FileTypeView, RevisionFileView, RevisionStateView,
    RevisionView, TagView, UserView, ViewContext,
};
