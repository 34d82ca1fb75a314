//! Path builders for the editing pages and API, so views can embed the URLs
//! clients act on without knowing the router layout.

use uuid::Uuid;

use super::domain::{CommentId, ContributionId, EditableType, EventId, RevisionId};

/// Path components identifying one editable timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableTarget {
    pub event_id: EventId,
    pub contribution_id: ContributionId,
    pub editable_type: EditableType,
}

pub fn dashboard(event_id: EventId) -> String {
    format!("/event/{}/editing", event_id.0)
}

pub fn timeline(target: &EditableTarget) -> String {
    format!("{}/timeline", editable_base(target))
}

pub fn api_file_types(event_id: EventId) -> String {
    format!("/api/v1/event/{}/editing/file-types", event_id.0)
}

pub fn api_editable(target: &EditableTarget) -> String {
    format!(
        "/api/v1/event/{}/contributions/{}/editing/{}",
        target.event_id.0,
        target.contribution_id.0,
        target.editable_type.name()
    )
}

pub fn api_review(target: &EditableTarget, revision_id: RevisionId) -> String {
    format!("{}/revisions/{}/review", api_editable(target), revision_id.0)
}

pub fn api_confirm(target: &EditableTarget, revision_id: RevisionId) -> String {
    format!("{}/revisions/{}/confirm", api_editable(target), revision_id.0)
}

pub fn api_create_comment(target: &EditableTarget, revision_id: RevisionId) -> String {
    format!("{}/revisions/{}/comments", api_editable(target), revision_id.0)
}

pub fn api_modify_comment(
    target: &EditableTarget,
    revision_id: RevisionId,
    comment_id: CommentId,
) -> String {
    format!(
        "{}/revisions/{}/comments/{}",
        api_editable(target),
        revision_id.0,
        comment_id.0
    )
}

pub fn api_download_file(
    target: &EditableTarget,
    revision_id: RevisionId,
    file_uuid: Uuid,
) -> String {
    format!(
        "{}/revisions/{}/files/{}",
        api_editable(target),
        revision_id.0,
        file_uuid
    )
}

pub fn api_export_files(target: &EditableTarget, revision_id: RevisionId) -> String {
    format!("{}/revisions/{}/files.zip", api_editable(target), revision_id.0)
}

fn editable_base(target: &EditableTarget) -> String {
    format!(
        "/event/{}/contributions/{}/editing/{}",
        target.event_id.0,
        target.contribution_id.0,
        target.editable_type.name()
    )
}
