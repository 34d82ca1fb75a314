use crate::infra::{seed_demo_event, InMemoryEditingStore};
use clap::Args;
use confedit::editing::{
    EditableView, EditingService, FileTypeView, TagView, ViewContext,
};
use confedit::error::AppError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Serialize the timeline as an anonymous client instead of the editing manager
    #[arg(long)]
    pub(crate) anonymous: bool,
}

#[derive(Debug, Serialize)]
struct DemoOutput {
    event: String,
    viewer: String,
    submitter: String,
    file_types: Vec<FileTypeView>,
    tags: Vec<TagView>,
    timeline: EditableView,
}

/// Seed an in-memory event and print its serialized editing timeline.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryEditingStore::default());
    let service = EditingService::new(store.clone());

    let seed = seed_demo_event(&store, &service).map_err(into_app_error)?;

    let event = service.event(seed.event_id).map_err(into_app_error)?;
    let contribution = service
        .contribution(seed.event_id, seed.contribution_id)
        .map_err(into_app_error)?;
    let tags = service.tags(seed.event_id).map_err(into_app_error)?;
    let editable = service
        .editable_for(seed.event_id, seed.contribution_id, seed.editable_type)
        .map_err(into_app_error)?;
    let file_types = service
        .list_file_types(seed.event_id)
        .map_err(into_app_error)?;

    let ctx = if args.anonymous {
        ViewContext::anonymous()
    } else {
        ViewContext::for_user(seed.manager.clone())
    };
    let viewer = ctx
        .user
        .as_ref()
        .map(|user| user.full_name.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    let output = DemoOutput {
        event: event.title.clone(),
        viewer,
        submitter: seed.submitter.full_name.clone(),
        file_types: file_types.iter().map(FileTypeView::from_file_type).collect(),
        tags: TagView::sorted(&tags),
        timeline: EditableView::from_editable(&editable, &event, &contribution, &tags, &ctx),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn into_app_error(error: confedit::editing::EditingServiceError) -> AppError {
    AppError::Io(std::io::Error::other(error.to_string()))
}
