use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::{
    error::DecodeError,
    models::validation::{
        lookup, optional_str, required_str, required_u64, validate_username,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRef {
    pub namespace: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeRequestEvent {
    pub author: String,
    pub author_name: String,
    pub action: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub project: ProjectRef,
    /// Assignee usernames in payload order, without duplicates.
    pub assignees: Vec<String>,
    /// Assignee entries dropped because they carried no usable username.
    pub rejected_assignees: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteableType {
    MergeRequest,
    Commit,
    Issue,
}

impl Display for NoteableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            NoteableType::MergeRequest => write!(f, "MergeRequest"),
            NoteableType::Commit => write!(f, "Commit"),
            NoteableType::Issue => write!(f, "Issue"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteEvent {
    pub author: String,
    pub author_name: String,
    pub note: String,
    pub url: String,
    pub project: ProjectRef,
    pub project_id: u64,
    pub merge_request_title: String,
    pub merge_request_iid: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NotificationEvent {
    MergeRequest(MergeRequestEvent),
    Note(NoteEvent),
    /// A note on a commit or issue. Recognised, but nobody is notified about it.
    UnhandledNote { noteable_type: NoteableType },
}

impl NotificationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::MergeRequest(_) => "merge_request",
            NotificationEvent::Note(_) | NotificationEvent::UnhandledNote { .. } => "note",
        }
    }

    pub fn author(&self) -> Option<&str> {
        match self {
            NotificationEvent::MergeRequest(event) => Some(&event.author),
            NotificationEvent::Note(event) => Some(&event.author),
            NotificationEvent::UnhandledNote { .. } => None,
        }
    }
}

/// Turns a raw webhook body into a typed event.
///
/// `object_kind` is the discriminator; GitLab also sends `event_type`, which is used when
/// `object_kind` is absent. Unknown kinds come back as an ignorable `DecodeError`.
pub fn decode(raw: &Value) -> Result<NotificationEvent, DecodeError> {
    let kind = optional_str(raw, "object_kind")
        .or_else(|| optional_str(raw, "event_type"))
        .ok_or(DecodeError::MissingKind)?;

    match kind {
        "merge_request" => decode_merge_request(raw).map(NotificationEvent::MergeRequest),
        "note" => decode_note(raw),
        other => Err(DecodeError::UnsupportedKind(other.to_string())),
    }
}

fn decode_project(raw: &Value) -> Result<ProjectRef, DecodeError> {
    Ok(ProjectRef {
        namespace: required_str(raw, "project.namespace")?,
        name: required_str(raw, "project.name")?,
        url: required_str(raw, "project.homepage")?,
    })
}

fn decode_merge_request(raw: &Value) -> Result<MergeRequestEvent, DecodeError> {
    let (assignees, rejected_assignees) = decode_assignees(raw)?;

    Ok(MergeRequestEvent {
        author: required_str(raw, "user.username")?,
        author_name: required_str(raw, "user.name")?,
        action: required_str(raw, "object_attributes.action")?,
        title: required_str(raw, "object_attributes.title")?,
        url: required_str(raw, "object_attributes.url")?,
        description: required_str(raw, "object_attributes.description")?,
        project: decode_project(raw)?,
        assignees,
        rejected_assignees,
    })
}

/// A bad entry only costs that entry; the rest of the list still gets notified.
fn decode_assignees(raw: &Value) -> Result<(Vec<String>, usize), DecodeError> {
    let entries = match lookup(raw, "assignees") {
        None => return Ok((Vec::new(), 0)),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(DecodeError::InvalidField {
                path: "assignees".to_string(),
                expected: "an array",
            });
        }
    };

    let mut usernames: Vec<String> = Vec::with_capacity(entries.len());
    let mut rejected = 0;

    for (index, entry) in entries.iter().enumerate() {
        let username = match entry.get("username").and_then(Value::as_str) {
            Some(username) => username,
            None => {
                warn!(index, "Assignee entry has no username, skipping");
                rejected += 1;
                continue;
            }
        };

        if let Err(e) = validate_username(username) {
            warn!(index, username, error = %e, "Assignee username rejected, skipping");
            rejected += 1;
            continue;
        }

        if !usernames.iter().any(|u| u == username) {
            usernames.push(username.to_string());
        }
    }

    Ok((usernames, rejected))
}

fn decode_note(raw: &Value) -> Result<NotificationEvent, DecodeError> {
    let noteable_type = match required_str(raw, "object_attributes.noteable_type")?.as_str() {
        "MergeRequest" => NoteableType::MergeRequest,
        "Commit" => NoteableType::Commit,
        "Issue" => NoteableType::Issue,
        other => return Err(DecodeError::UnsupportedNoteable(other.to_string())),
    };

    if noteable_type != NoteableType::MergeRequest {
        return Ok(NotificationEvent::UnhandledNote { noteable_type });
    }

    let project_id = match lookup(raw, "project.id") {
        Some(_) => required_u64(raw, "project.id")?,
        None => required_u64(raw, "project_id")?,
    };

    Ok(NotificationEvent::Note(NoteEvent {
        author: required_str(raw, "user.username")?,
        author_name: required_str(raw, "user.name")?,
        note: required_str(raw, "object_attributes.note")?,
        url: required_str(raw, "object_attributes.url")?,
        project: decode_project(raw)?,
        project_id,
        merge_request_title: required_str(raw, "merge_request.title")?,
        merge_request_iid: required_u64(raw, "merge_request.iid")?,
    }))
}
