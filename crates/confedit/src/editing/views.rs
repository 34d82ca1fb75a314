//! Serialization views shaping the editing aggregate for API consumers.
//!
//! Views are plain serde structs built from domain values plus a
//! [`ViewContext`] carrying the ambient user, which gates permission-derived
//! fields and the visibility of internal comments.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::domain::{
    CommentId, Contribution, ContributionId, Editable, EditableId, EditableType, EditingFileType,
    EditingRevision, EditingRevisionComment, EditingRevisionFile, EditingTag, Event,
    FinalRevisionState, FileTypeId, InitialRevisionState, RevisionId, TagId, User, UserId,
};
use super::urls::{self, EditableTarget};
use crate::text::{escape_html, natural_sort_key};

/// Ambient request context carried into serialization.
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    pub user: Option<User>,
}

impl ViewContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn for_user(user: User) -> Self {
        Self { user: Some(user) }
    }
}

/// Descriptor triple rendered for initial and final revision states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionStateView {
    pub title: &'static str,
    pub name: &'static str,
    pub css_class: &'static str,
}

impl RevisionStateView {
    pub fn from_initial(state: InitialRevisionState) -> Self {
        Self {
            title: state.title(),
            name: state.name(),
            css_class: state.css_class(),
        }
    }

    pub fn from_final(state: FinalRevisionState) -> Self {
        Self {
            title: state.title(),
            name: state.name(),
            css_class: state.css_class(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileTypeView {
    pub id: FileTypeId,
    pub name: String,
    pub extensions: Vec<String>,
    pub allow_multiple_files: bool,
    pub required: bool,
    pub publishable: bool,
}

impl FileTypeView {
    pub fn from_file_type(file_type: &EditingFileType) -> Self {
        Self {
            id: file_type.id,
            name: file_type.name.clone(),
            extensions: file_type.extensions.clone(),
            allow_multiple_files: file_type.allow_multiple_files,
            required: file_type.required,
            publishable: file_type.publishable,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagView {
    pub id: TagId,
    pub code: String,
    pub title: String,
    pub color: String,
    pub system: bool,
    pub verbose_title: String,
}

impl TagView {
    pub fn from_tag(tag: &EditingTag) -> Self {
        Self {
            id: tag.id,
            code: tag.code.clone(),
            title: tag.title.clone(),
            color: tag.color.clone(),
            system: tag.system,
            verbose_title: tag.verbose_title(),
        }
    }

    /// Serialize a tag list ordered by the human reading of `verbose_title`,
    /// so "Item 2" precedes "Item 10".
    pub fn sorted(tags: &[EditingTag]) -> Vec<TagView> {
        let mut views: Vec<TagView> = tags.iter().map(Self::from_tag).collect();
        views.sort_by_key(|view| natural_sort_key(&view.verbose_title));
        views
    }
}

/// Restricted account subset exposed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub avatar_bg_color: String,
    pub full_name: String,
}

impl UserView {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            avatar_bg_color: user.avatar_bg_color.clone(),
            full_name: user.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RevisionFileView {
    pub uuid: Uuid,
    pub filename: String,
    pub size: u64,
    pub content_type: String,
    pub file_type: FileTypeId,
    pub download_url: String,
}

impl RevisionFileView {
    fn from_file(
        file: &EditingRevisionFile,
        target: &EditableTarget,
        revision_id: RevisionId,
    ) -> Self {
        Self {
            uuid: file.uuid,
            filename: file.filename.clone(),
            size: file.size,
            content_type: file.content_type.clone(),
            file_type: file.file_type_id,
            download_url: urls::api_download_file(target, revision_id, file.uuid),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: CommentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
    pub created_dt: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_dt: Option<DateTime<Utc>>,
    pub internal: bool,
    pub system: bool,
    pub text: String,
    pub html: String,
    pub can_modify: bool,
    pub modify_comment_url: String,
    pub revision_id: RevisionId,
}

impl CommentView {
    pub fn from_comment(
        comment: &EditingRevisionComment,
        event: &Event,
        target: &EditableTarget,
        ctx: &ViewContext,
    ) -> Self {
        Self {
            id: comment.id,
            user: comment.author.as_ref().map(UserView::from_user),
            created_dt: comment.created_dt,
            modified_dt: comment.modified_dt,
            internal: comment.internal,
            system: comment.system,
            text: comment.text.clone(),
            html: escape_html(&comment.text),
            can_modify: comment.can_modify(ctx.user.as_ref(), event),
            modify_comment_url: urls::api_modify_comment(target, comment.revision_id, comment.id),
            revision_id: comment.revision_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RevisionView {
    pub id: RevisionId,
    pub created_dt: DateTime<Utc>,
    pub submitter: UserView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<UserView>,
    pub files: Vec<RevisionFileView>,
    pub comment: String,
    pub comment_html: String,
    pub comments: Vec<CommentView>,
    pub initial_state: RevisionStateView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_state: Option<RevisionStateView>,
    pub tags: Vec<TagView>,
    pub create_comment_url: String,
    pub download_files_url: String,
    pub review_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_url: Option<String>,
}

impl RevisionView {
    pub fn from_revision(
        revision: &EditingRevision,
        event: &Event,
        tags: &[EditingTag],
        target: &EditableTarget,
        ctx: &ViewContext,
    ) -> Self {
        let manages = event.can_manage_editing(ctx.user.as_ref());
        let comments = revision
            .comments
            .iter()
            .filter(|comment| !comment.internal || manages)
            .map(|comment| CommentView::from_comment(comment, event, target, ctx))
            .collect();
        let revision_tags: Vec<EditingTag> = tags
            .iter()
            .filter(|tag| revision.tag_ids.contains(&tag.id))
            .cloned()
            .collect();
        let confirm_url = revision
            .awaits_submitter_confirmation()
            .then(|| urls::api_confirm(target, revision.id));

        Self {
            id: revision.id,
            created_dt: revision.created_dt,
            submitter: UserView::from_user(&revision.submitter),
            editor: revision.editor.as_ref().map(UserView::from_user),
            files: revision
                .files
                .iter()
                .map(|file| RevisionFileView::from_file(file, target, revision.id))
                .collect(),
            comment: revision.comment.clone(),
            comment_html: escape_html(&revision.comment),
            comments,
            initial_state: RevisionStateView::from_initial(revision.initial_state),
            final_state: revision.final_state.map(RevisionStateView::from_final),
            tags: TagView::sorted(&revision_tags),
            create_comment_url: urls::api_create_comment(target, revision.id),
            download_files_url: urls::api_export_files(target, revision.id),
            review_url: urls::api_review(target, revision.id),
            confirm_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributionView {
    pub id: ContributionId,
    pub title: String,
    pub friendly_id: u32,
}

impl ContributionView {
    pub fn from_contribution(contribution: &Contribution) -> Self {
        Self {
            id: contribution.id,
            title: contribution.title.clone(),
            friendly_id: contribution.friendly_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EditableView {
    pub id: EditableId,
    #[serde(rename = "type")]
    pub editable_type: EditableType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<UserView>,
    pub revisions: Vec<RevisionView>,
    pub contribution: ContributionView,
    pub can_comment: bool,
    pub can_create_internal_comments: bool,
}

impl EditableView {
    pub fn from_editable(
        editable: &Editable,
        event: &Event,
        contribution: &Contribution,
        tags: &[EditingTag],
        ctx: &ViewContext,
    ) -> Self {
        let target = EditableTarget {
            event_id: event.id,
            contribution_id: contribution.id,
            editable_type: editable.editable_type,
        };

        Self {
            id: editable.id,
            editable_type: editable.editable_type,
            editor: editable.editor.as_ref().map(UserView::from_user),
            revisions: editable
                .revisions
                .iter()
                .map(|revision| RevisionView::from_revision(revision, event, tags, &target, ctx))
                .collect(),
            contribution: ContributionView::from_contribution(contribution),
            can_comment: editable.can_comment(ctx.user.as_ref(), event),
            can_create_internal_comments: event.can_manage_editing(ctx.user.as_ref()),
        }
    }
}
