use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ContributionId, EditableType, EventId, FileTypeId, RevisionId, User, UserId};
use super::pages;
use super::repository::{EditableRepository, FileTypeRepository, RepositoryError};
use super::review::{ConfirmArgs, ReviewArgs};
use super::service::{CommentArgs, EditingService, EditingServiceError, FileTypeArgs};
use super::views::{EditableView, FileTypeView, TagView, ViewContext};

/// Router builder exposing the editing pages and API endpoints.
pub fn editing_router<R>(service: Arc<EditingService<R>>) -> Router
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    Router::new()
        .route("/event/:event_id/editing", get(dashboard_page::<R>))
        .route(
            "/event/:event_id/contributions/:contribution_id/editing/:editable_type/timeline",
            get(timeline_page::<R>),
        )
        .route(
            "/api/v1/event/:event_id/editing/file-types",
            get(list_file_types::<R>).post(create_file_type::<R>),
        )
        .route(
            "/api/v1/event/:event_id/editing/file-types/:file_type_id",
            patch(update_file_type::<R>).delete(delete_file_type::<R>),
        )
        .route("/api/v1/event/:event_id/editing/tags", get(list_tags::<R>))
        .route(
            "/api/v1/event/:event_id/contributions/:contribution_id/editing/:editable_type",
            get(editable_detail::<R>),
        )
        .route(
            "/api/v1/event/:event_id/contributions/:contribution_id/editing/:editable_type/revisions/:revision_id/review",
            post(review_revision::<R>),
        )
        .route(
            "/api/v1/event/:event_id/contributions/:contribution_id/editing/:editable_type/revisions/:revision_id/confirm",
            post(confirm_revision::<R>),
        )
        .route(
            "/api/v1/event/:event_id/contributions/:contribution_id/editing/:editable_type/revisions/:revision_id/comments",
            post(create_comment::<R>),
        )
        .with_state(service)
}

pub(crate) async fn dashboard_page<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path(event_id): Path<i64>,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    let event_id = EventId(event_id);
    let event = match service.event(event_id) {
        Ok(event) => event,
        Err(error) => return page_error_response(error),
    };
    match service.list_file_types(event_id) {
        Ok(file_types) => Html(pages::render_dashboard(&event, &file_types)).into_response(),
        Err(error) => page_error_response(error),
    }
}

pub(crate) async fn timeline_page<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path((event_id, contribution_id, editable_type)): Path<(i64, i64, String)>,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    let Some(editable_type) = EditableType::from_name(&editable_type) else {
        return page_not_found("unknown editable type");
    };
    let event_id = EventId(event_id);
    let contribution_id = ContributionId(contribution_id);

    let event = match service.event(event_id) {
        Ok(event) => event,
        Err(error) => return page_error_response(error),
    };
    let contribution = match service.contribution(event_id, contribution_id) {
        Ok(contribution) => contribution,
        Err(error) => return page_error_response(error),
    };
    match service.editable_for(event_id, contribution_id, editable_type) {
        Ok(editable) => {
            Html(pages::render_timeline(&event, &contribution, &editable)).into_response()
        }
        Err(EditingServiceError::Repository(RepositoryError::NotFound)) => {
            page_not_found("this contribution has no editable")
        }
        Err(error) => page_error_response(error),
    }
}

pub(crate) async fn list_file_types<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path(event_id): Path<i64>,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    match service.list_file_types(EventId(event_id)) {
        Ok(file_types) => {
            let views: Vec<FileTypeView> =
                file_types.iter().map(FileTypeView::from_file_type).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn create_file_type<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path(event_id): Path<i64>,
    Json(args): Json<FileTypeArgs>,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    match service.create_file_type(EventId(event_id), args) {
        Ok(file_type) => (
            StatusCode::CREATED,
            Json(FileTypeView::from_file_type(&file_type)),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn update_file_type<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path((event_id, file_type_id)): Path<(i64, i64)>,
    Json(args): Json<FileTypeArgs>,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    match service.update_file_type(EventId(event_id), FileTypeId(file_type_id), args) {
        Ok(file_type) => (
            StatusCode::OK,
            Json(FileTypeView::from_file_type(&file_type)),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn delete_file_type<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path((event_id, file_type_id)): Path<(i64, i64)>,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    match service.delete_file_type(EventId(event_id), FileTypeId(file_type_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_tags<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path(event_id): Path<i64>,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    match service.tags(EventId(event_id)) {
        Ok(tags) => (StatusCode::OK, Json(TagView::sorted(&tags))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn editable_detail<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path((event_id, contribution_id, editable_type)): Path<(i64, i64, String)>,
    headers: HeaderMap,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    let Some(editable_type) = EditableType::from_name(&editable_type) else {
        return not_found_response();
    };
    let event_id = EventId(event_id);
    let contribution_id = ContributionId(contribution_id);

    let ctx = match view_context(&service, &headers) {
        Ok(ctx) => ctx,
        Err(error) => return service_error_response(error),
    };

    let event = match service.event(event_id) {
        Ok(event) => event,
        Err(error) => return service_error_response(error),
    };
    let contribution = match service.contribution(event_id, contribution_id) {
        Ok(contribution) => contribution,
        Err(error) => return service_error_response(error),
    };
    let tags = match service.tags(event_id) {
        Ok(tags) => tags,
        Err(error) => return service_error_response(error),
    };

    match service.editable_for(event_id, contribution_id, editable_type) {
        Ok(editable) => (
            StatusCode::OK,
            Json(EditableView::from_editable(
                &editable,
                &event,
                &contribution,
                &tags,
                &ctx,
            )),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn review_revision<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path((event_id, contribution_id, editable_type, revision_id)): Path<(i64, i64, String, i64)>,
    headers: HeaderMap,
    Json(args): Json<ReviewArgs>,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    let Some(editable_type) = EditableType::from_name(&editable_type) else {
        return not_found_response();
    };
    let user = match required_user(&service, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.review_revision(
        EventId(event_id),
        ContributionId(contribution_id),
        editable_type,
        RevisionId(revision_id),
        user,
        args,
    ) {
        Ok(editable) => {
            let latest = editable.latest_revision().map(|revision| revision.id);
            (
                StatusCode::OK,
                Json(json!({
                    "editable_id": editable.id,
                    "latest_revision_id": latest,
                })),
            )
                .into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn confirm_revision<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path((event_id, contribution_id, editable_type, revision_id)): Path<(i64, i64, String, i64)>,
    headers: HeaderMap,
    Json(args): Json<ConfirmArgs>,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    let Some(editable_type) = EditableType::from_name(&editable_type) else {
        return not_found_response();
    };
    let user = match required_user(&service, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.confirm_revision(
        EventId(event_id),
        ContributionId(contribution_id),
        editable_type,
        RevisionId(revision_id),
        user,
        args,
    ) {
        Ok(editable) => (
            StatusCode::OK,
            Json(json!({ "editable_id": editable.id })),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn create_comment<R>(
    State(service): State<Arc<EditingService<R>>>,
    Path((event_id, contribution_id, editable_type, revision_id)): Path<(i64, i64, String, i64)>,
    headers: HeaderMap,
    Json(args): Json<CommentArgs>,
) -> Response
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    let Some(editable_type) = EditableType::from_name(&editable_type) else {
        return not_found_response();
    };
    let user = match required_user(&service, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.create_comment(
        EventId(event_id),
        ContributionId(contribution_id),
        editable_type,
        RevisionId(revision_id),
        user,
        args,
    ) {
        Ok(comment) => (
            StatusCode::CREATED,
            Json(json!({ "comment_id": comment.id, "revision_id": comment.revision_id })),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

/// Resolve the ambient user from the `X-User-Id` header, if any.
fn view_context<R>(
    service: &EditingService<R>,
    headers: &HeaderMap,
) -> Result<ViewContext, EditingServiceError>
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    let Some(raw) = headers.get("x-user-id") else {
        return Ok(ViewContext::anonymous());
    };
    let user_id = raw
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<i64>().ok());
    match user_id {
        Some(id) => Ok(ViewContext {
            user: service.resolve_user(UserId(id))?,
        }),
        None => Ok(ViewContext::anonymous()),
    }
}

fn required_user<R>(
    service: &EditingService<R>,
    headers: &HeaderMap,
) -> Result<User, Response>
where
    R: FileTypeRepository + EditableRepository + 'static,
{
    match view_context(service, headers) {
        Ok(ViewContext { user: Some(user) }) => Ok(user),
        Ok(ViewContext { user: None }) => Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "a known user is required for this action" })),
        )
            .into_response()),
        Err(error) => Err(service_error_response(error)),
    }
}

pub(crate) fn service_error_response(error: EditingServiceError) -> Response {
    match error {
        EditingServiceError::Validation(field) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": field.message, "field": field.field })),
        )
            .into_response(),
        EditingServiceError::Repository(RepositoryError::NotFound) => not_found_response(),
        EditingServiceError::Repository(RepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "name is already in use" })),
        )
            .into_response(),
        EditingServiceError::InvalidState(reason) => {
            (StatusCode::CONFLICT, Json(json!({ "error": reason }))).into_response()
        }
        EditingServiceError::PermissionDenied => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "insufficient permissions" })),
        )
            .into_response(),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": other.to_string() })),
        )
            .into_response(),
    }
}

fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found" })),
    )
        .into_response()
}

fn page_not_found(detail: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(pages::render_not_found(detail))).into_response()
}

fn page_error_response(error: EditingServiceError) -> Response {
    match error {
        EditingServiceError::Repository(RepositoryError::NotFound) => {
            page_not_found("no such event or contribution")
        }
        other => service_error_response(other),
    }
}
