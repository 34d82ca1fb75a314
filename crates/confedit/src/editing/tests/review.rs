use super::common::*;
use crate::editing::domain::{EditableType, FinalRevisionState, InitialRevisionState, RevisionId};
use crate::editing::review::{ConfirmArgs, ConfirmationAction, ReviewAction, ReviewArgs};
use crate::editing::service::EditingServiceError;

fn review(action: ReviewAction, comment: &str) -> ReviewArgs {
    ReviewArgs {
        action,
        comment: comment.to_string(),
    }
}

fn confirm(action: ConfirmationAction, comment: &str) -> ConfirmArgs {
    ConfirmArgs {
        action,
        comment: comment.to_string(),
    }
}

#[test]
fn accept_closes_the_latest_revision_and_records_the_editor() {
    let (service, _) = build_service();

    let editable = service
        .review_revision(
            EVENT,
            CONTRIB_READY,
            EditableType::Paper,
            RevisionId(1),
            assigned_editor(),
            review(ReviewAction::Accept, ""),
        )
        .expect("accept succeeds without a comment");

    let revision = editable.latest_revision().expect("revision exists");
    assert_eq!(revision.final_state, Some(FinalRevisionState::Accepted));
    assert_eq!(
        revision.editor.as_ref().map(|editor| editor.id),
        Some(assigned_editor().id)
    );
}

#[test]
fn reject_with_empty_comment_fails_on_the_comment_field() {
    let (service, _) = build_service();

    let error = service
        .review_revision(
            EVENT,
            CONTRIB_READY,
            EditableType::Paper,
            RevisionId(1),
            assigned_editor(),
            review(ReviewAction::Reject, ""),
        )
        .unwrap_err();

    match error {
        EditingServiceError::Validation(field) => {
            assert_eq!(field.field, "comment");
            assert_eq!(field.message, "This field is required");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn reject_with_comment_records_rejection_and_a_system_note() {
    let (service, store) = build_service();

    service
        .review_revision(
            EVENT,
            CONTRIB_READY,
            EditableType::Paper,
            RevisionId(1),
            assigned_editor(),
            review(ReviewAction::Reject, "Template not followed"),
        )
        .expect("reject succeeds with a comment");

    use crate::editing::repository::EditableRepository;
    let stored = store
        .editable_for_contribution(EVENT, CONTRIB_READY, EditableType::Paper)
        .expect("fetch succeeds")
        .expect("editable exists");
    let revision = stored.latest_revision().expect("revision exists");
    assert_eq!(revision.final_state, Some(FinalRevisionState::Rejected));
    let note = revision.comments.last().expect("system note appended");
    assert!(note.system);
    assert_eq!(note.text, "Template not followed");
}

#[test]
fn request_update_sends_the_revision_back_to_the_submitter() {
    let (service, _) = build_service();

    let editable = service
        .review_revision(
            EVENT,
            CONTRIB_READY,
            EditableType::Paper,
            RevisionId(1),
            assigned_editor(),
            review(ReviewAction::RequestUpdate, "Please shorten the abstract"),
        )
        .expect("request_update succeeds");

    let revision = editable.latest_revision().expect("revision exists");
    assert_eq!(
        revision.final_state,
        Some(FinalRevisionState::NeedsSubmitterChanges)
    );
}

#[test]
fn update_replaces_the_revision_with_a_follow_up_awaiting_confirmation() {
    let (service, _) = build_service();

    let editable = service
        .review_revision(
            EVENT,
            CONTRIB_READY,
            EditableType::Paper,
            RevisionId(1),
            assigned_editor(),
            review(ReviewAction::Update, "Fixed margins myself"),
        )
        .expect("update succeeds");

    assert_eq!(editable.revisions.len(), 2);
    assert_eq!(
        editable.revisions[0].final_state,
        Some(FinalRevisionState::Replaced)
    );

    let follow_up = editable.latest_revision().expect("follow-up exists");
    assert_eq!(
        follow_up.initial_state,
        InitialRevisionState::NeedsSubmitterConfirmation
    );
    assert!(follow_up.final_state.is_none());
    assert!(follow_up.awaits_submitter_confirmation());
    // The follow-up still belongs to the submitter, who must confirm it.
    assert_eq!(follow_up.submitter.id, submitter().id);
    assert_eq!(follow_up.files, editable.revisions[0].files);
}

#[test]
fn reviewing_a_stale_revision_is_rejected() {
    let (service, _) = build_service();

    let error = service
        .review_revision(
            EVENT,
            CONTRIB_CONFIRMING,
            EditableType::Paper,
            RevisionId(1),
            assigned_editor(),
            review(ReviewAction::Accept, ""),
        )
        .unwrap_err();

    assert!(matches!(error, EditingServiceError::InvalidState(_)));
}

#[test]
fn outsiders_may_not_review() {
    let (service, _) = build_service();

    let error = service
        .review_revision(
            EVENT,
            CONTRIB_READY,
            EditableType::Paper,
            RevisionId(1),
            outsider(),
            review(ReviewAction::Accept, ""),
        )
        .unwrap_err();

    assert!(matches!(error, EditingServiceError::PermissionDenied));
}

#[test]
fn managers_may_review_without_being_assigned() {
    let (service, _) = build_service();

    service
        .review_revision(
            EVENT,
            CONTRIB_READY,
            EditableType::Paper,
            RevisionId(1),
            manager(),
            review(ReviewAction::Accept, ""),
        )
        .expect("managers hold the paper_editing permission");
}

#[test]
fn confirm_accept_finalizes_the_revision() {
    let (service, _) = build_service();

    let editable = service
        .confirm_revision(
            EVENT,
            CONTRIB_CONFIRMING,
            EditableType::Paper,
            RevisionId(2),
            submitter(),
            confirm(ConfirmationAction::Accept, "Looks good"),
        )
        .expect("confirmation succeeds");

    let revision = editable.latest_revision().expect("revision exists");
    assert_eq!(revision.final_state, Some(FinalRevisionState::Accepted));
    assert!(!revision.awaits_submitter_confirmation());
    let comment = revision.comments.last().expect("comment recorded");
    assert!(!comment.system);
    assert_eq!(comment.text, "Looks good");
}

#[test]
fn confirm_reject_asks_for_changes() {
    let (service, _) = build_service();

    let editable = service
        .confirm_revision(
            EVENT,
            CONTRIB_CONFIRMING,
            EditableType::Paper,
            RevisionId(2),
            submitter(),
            confirm(ConfirmationAction::Reject, ""),
        )
        .expect("confirmation succeeds");

    let revision = editable.latest_revision().expect("revision exists");
    assert_eq!(
        revision.final_state,
        Some(FinalRevisionState::NeedsSubmitterChanges)
    );
}

#[test]
fn confirming_a_revision_not_awaiting_confirmation_is_rejected() {
    let (service, _) = build_service();

    let error = service
        .confirm_revision(
            EVENT,
            CONTRIB_READY,
            EditableType::Paper,
            RevisionId(1),
            submitter(),
            confirm(ConfirmationAction::Accept, ""),
        )
        .unwrap_err();

    assert!(matches!(error, EditingServiceError::InvalidState(_)));
}

#[test]
fn only_the_submitter_may_confirm() {
    let (service, _) = build_service();

    let error = service
        .confirm_revision(
            EVENT,
            CONTRIB_CONFIRMING,
            EditableType::Paper,
            RevisionId(2),
            assigned_editor(),
            confirm(ConfirmationAction::Accept, ""),
        )
        .unwrap_err();

    assert!(matches!(error, EditingServiceError::PermissionDenied));
}
