use super::common::*;
use crate::editing::domain::EventId;
use crate::editing::repository::RepositoryError;
use crate::editing::service::{EditingServiceError, FileTypeArgs};

fn args(name: &str) -> FileTypeArgs {
    FileTypeArgs {
        name: name.to_string(),
        extensions: vec![".PDF".to_string()],
        allow_multiple_files: false,
        required: false,
        publishable: false,
    }
}

#[test]
fn names_differing_only_in_case_conflict_within_an_event() {
    let (service, _) = build_service();

    service
        .create_file_type(EVENT, args("Camera-ready"))
        .expect("first name is free");
    let error = service
        .create_file_type(EVENT, args("CAMERA-READY"))
        .unwrap_err();

    assert!(matches!(
        error,
        EditingServiceError::Repository(RepositoryError::Conflict)
    ));
}

#[test]
fn the_same_name_is_free_on_another_event() {
    let (service, _) = build_service();

    service
        .create_file_type(EVENT, args("Camera-ready"))
        .expect("first name is free");
    service
        .create_file_type(EventId(2), args("camera-ready"))
        .expect("other events have their own namespace");
}

#[test]
fn seeded_registry_name_is_taken() {
    let (service, _) = build_service();
    // "Paper" is seeded with id 900.
    let error = service.create_file_type(EVENT, args("paper")).unwrap_err();
    assert!(matches!(
        error,
        EditingServiceError::Repository(RepositoryError::Conflict)
    ));
}

#[test]
fn extensions_are_normalized() {
    let (service, _) = build_service();
    let file_type = service
        .create_file_type(EVENT, args("Source archive"))
        .expect("creates");
    assert_eq!(file_type.extensions, vec!["pdf".to_string()]);
}

#[test]
fn blank_names_are_rejected_per_field() {
    let (service, _) = build_service();
    let error = service.create_file_type(EVENT, args("   ")).unwrap_err();
    match error {
        EditingServiceError::Validation(field) => assert_eq!(field.field, "name"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn update_cannot_steal_an_existing_name() {
    let (service, _) = build_service();
    let file_type = service
        .create_file_type(EVENT, args("Slides"))
        .expect("creates");

    let error = service
        .update_file_type(EVENT, file_type.id, args("PAPER"))
        .unwrap_err();
    assert!(matches!(
        error,
        EditingServiceError::Repository(RepositoryError::Conflict)
    ));
}

#[test]
fn update_changes_flags_in_place() {
    let (service, _) = build_service();
    let file_type = service
        .create_file_type(EVENT, args("Slides"))
        .expect("creates");

    let updated = service
        .update_file_type(
            EVENT,
            file_type.id,
            FileTypeArgs {
                name: "Slides".to_string(),
                extensions: vec!["pdf".to_string(), "key".to_string()],
                allow_multiple_files: true,
                required: false,
                publishable: true,
            },
        )
        .expect("updates");

    assert!(updated.allow_multiple_files);
    assert!(updated.publishable);
    assert_eq!(updated.extensions.len(), 2);
}

#[test]
fn deleting_an_unknown_file_type_is_not_found() {
    let (service, _) = build_service();
    let error = service
        .delete_file_type(EVENT, crate::editing::domain::FileTypeId(4242))
        .unwrap_err();
    assert!(matches!(
        error,
        EditingServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn listing_is_ordered_by_id() {
    let (service, _) = build_service();
    service
        .create_file_type(EVENT, args("Slides"))
        .expect("creates");
    service
        .create_file_type(EVENT, args("Poster"))
        .expect("creates");

    let listed = service.list_file_types(EVENT).expect("lists");
    let ids: Vec<i64> = listed.iter().map(|file_type| file_type.id.0).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(listed.last().map(|file_type| file_type.id.0), Some(900));
}
