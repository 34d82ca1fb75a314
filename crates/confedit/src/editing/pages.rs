//! Inline-rendered HTML for the dashboard and timeline pages.
//!
//! Rendering stays deliberately small: a page shell, escaped titles, and data
//! attributes the frontend picks the aggregate ids from.

use super::domain::{Contribution, Editable, EditingFileType, Event};
use crate::text::escape_html;

pub fn render_dashboard(event: &Event, file_types: &[EditingFileType]) -> String {
    let mut items = String::new();
    for file_type in file_types {
        let extensions = if file_type.extensions.is_empty() {
            "any".to_string()
        } else {
            file_type.extensions.join(", ")
        };
        items.push_str(&format!(
            "<li data-file-type-id=\"{}\">{} ({})</li>\n",
            file_type.id.0,
            escape_html(&file_type.name),
            escape_html(&extensions)
        ));
    }

    page(
        &format!("Editing: {}", event.title),
        &format!(
            "<main data-event-id=\"{}\">\n<h1>Editing dashboard</h1>\n\
             <h2>{}</h2>\n<ul class=\"file-types\">\n{}</ul>\n</main>",
            event.id.0,
            escape_html(&event.title),
            items
        ),
    )
}

pub fn render_timeline(event: &Event, contribution: &Contribution, editable: &Editable) -> String {
    page(
        &format!("Timeline: {}", contribution.title),
        &format!(
            "<main data-event-id=\"{}\" data-contribution-id=\"{}\" \
             data-editable-id=\"{}\" data-editable-type=\"{}\">\n\
             <h1>{}</h1>\n<p class=\"revisions\">{} revision(s)</p>\n</main>",
            event.id.0,
            contribution.id.0,
            editable.id.0,
            editable.editable_type.name(),
            escape_html(&contribution.title),
            editable.revisions.len()
        ),
    )
}

pub fn render_not_found(detail: &str) -> String {
    page(
        "Not found",
        &format!("<main><h1>Not found</h1>\n<p>{}</p></main>", escape_html(detail)),
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}
