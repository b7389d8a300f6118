use serde::Serialize;

use crate::models::event::{MergeRequestEvent, NoteEvent, NotificationEvent};

/// What every recipient of one event receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    pub message: String,
    pub title: String,
    pub title_link: String,
    pub text: String,
}

/// Renders the direct message for an event. Notes on commits and issues have no rendering.
pub fn format(event: &NotificationEvent) -> Option<NotificationPayload> {
    match event {
        NotificationEvent::MergeRequest(event) => Some(format_merge_request(event)),
        NotificationEvent::Note(event) => Some(format_note(event)),
        NotificationEvent::UnhandledNote { .. } => None,
    }
}

pub fn format_merge_request(event: &MergeRequestEvent) -> NotificationPayload {
    let message = format!(
        "{} ({}) {} merge request [{}]({}) in [{} / {}]({})",
        event.author_name,
        event.author,
        event.action,
        event.title,
        event.url,
        event.project.namespace,
        event.project.name,
        event.project.url
    );

    NotificationPayload {
        message,
        title: event.title.clone(),
        title_link: event.url.clone(),
        text: event.description.clone(),
    }
}

pub fn format_note(event: &NoteEvent) -> NotificationPayload {
    let message = format!(
        "{} ({}) add comment to [{}]({}) in [{} / {}]({})",
        event.author_name,
        event.author,
        event.merge_request_title,
        event.url,
        event.project.namespace,
        event.project.name,
        event.project.url
    );

    NotificationPayload {
        message,
        title: event.merge_request_title.clone(),
        title_link: event.url.clone(),
        text: event.note.clone(),
    }
}
