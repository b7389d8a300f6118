use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    clients::gitlab::GitLabClient,
    dispatcher::dispatch,
    models::{
        delivery::ProcessingReport,
        event::{NotificationEvent, decode},
        payload::format,
    },
    relay::Relay,
};

/// Usernames that should hear about `event`.
///
/// Merge request events go to every assignee, the author included. Notes on a merge request
/// go to everyone who has commented on it except the note's author. A failed participant
/// lookup yields nobody rather than an error.
pub async fn resolve_recipients(event: &NotificationEvent, gitlab: &GitLabClient) -> Vec<String> {
    match event {
        NotificationEvent::MergeRequest(event) => event.assignees.clone(),
        NotificationEvent::Note(note) => {
            let participants = match gitlab
                .find_participants(note.project_id, note.merge_request_iid)
                .await
            {
                Ok(participants) => participants,
                Err(e) => {
                    warn!(
                        project_id = note.project_id,
                        merge_request_iid = note.merge_request_iid,
                        error = %e,
                        "Participant lookup failed, nobody will be notified"
                    );
                    return Vec::new();
                }
            };

            let mut recipients: Vec<String> = Vec::with_capacity(participants.len());
            for username in participants {
                if username != note.author && !recipients.contains(&username) {
                    recipients.push(username);
                }
            }
            recipients
        }
        NotificationEvent::UnhandledNote { noteable_type } => {
            debug!(noteable_type = %noteable_type, "Notes on this target are not relayed");
            Vec::new()
        }
    }
}

/// Runs one webhook body through decode, resolve, format and dispatch.
pub async fn process_event(raw: &Value, relay: &Relay, trace_id: &str) -> ProcessingReport {
    let event = match decode(raw) {
        Ok(event) => event,
        Err(e) => {
            let kind = raw
                .get("object_kind")
                .and_then(Value::as_str)
                .map(str::to_string);

            if e.is_ignored() {
                debug!(trace_id, error = %e, "Ignoring webhook event");
            } else {
                warn!(trace_id, error = %e, "Dropping malformed webhook event");
            }

            return ProcessingReport::ignored(trace_id.to_string(), kind, e.to_string());
        }
    };

    info!(
        trace_id,
        kind = event.kind(),
        author = event.author().unwrap_or_default(),
        "Processing webhook event"
    );

    let recipients = resolve_recipients(&event, &relay.gitlab).await;

    let payload = match format(&event) {
        Some(payload) if !recipients.is_empty() => payload,
        _ => {
            info!(trace_id, kind = event.kind(), "No recipients for event");
            return ProcessingReport::completed(
                trace_id.to_string(),
                event.kind().to_string(),
                recipients,
                Default::default(),
            );
        }
    };

    let report = dispatch(
        &relay.mattermost,
        &recipients,
        &payload,
        relay.config.dispatch_concurrency,
    )
    .await;

    info!(
        trace_id,
        kind = event.kind(),
        recipients = recipients.len(),
        delivered = report.delivered(),
        skipped = report.skipped(),
        "Webhook event processed"
    );

    ProcessingReport::completed(
        trace_id.to_string(),
        event.kind().to_string(),
        recipients,
        report,
    )
}
