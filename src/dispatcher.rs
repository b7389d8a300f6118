use futures_util::{StreamExt, stream};
use tracing::{info, warn};

use crate::{
    clients::mattermost::MattermostClient,
    models::{
        delivery::{DeliveryResult, DeliveryStage, DispatchReport},
        payload::NotificationPayload,
    },
};

/// Sends `payload` to every recipient, at most once each.
///
/// Recipients are independent: a failure for one is recorded as a skip and never stops the
/// others. Nothing is retried.
pub async fn dispatch(
    client: &MattermostClient,
    recipients: &[String],
    payload: &NotificationPayload,
    concurrency: usize,
) -> DispatchReport {
    let mut unique: Vec<&str> = Vec::with_capacity(recipients.len());
    for username in recipients {
        if !unique.contains(&username.as_str()) {
            unique.push(username.as_str());
        }
    }

    let deliveries: Vec<_> = unique
        .into_iter()
        .map(|username| deliver(client, username, payload))
        .collect();

    let results = stream::iter(deliveries)
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    DispatchReport { results }
}

async fn deliver(
    client: &MattermostClient,
    username: &str,
    payload: &NotificationPayload,
) -> DeliveryResult {
    let user = match client.get_user_by_username(username).await {
        Ok(user) => user,
        Err(e) => return skip(username, DeliveryStage::UserLookup, e.to_string()),
    };

    let channel = match client.create_direct_channel(&user.id).await {
        Ok(channel) => channel,
        Err(e) => return skip(username, DeliveryStage::DirectChannel, e.to_string()),
    };

    match client.create_post(&channel.id, payload).await {
        Ok(post) => {
            info!(
                username,
                user_id = %user.id,
                channel_id = %channel.id,
                post_id = %post.id,
                "Notification delivered"
            );
            DeliveryResult::delivered(username.to_string(), post.id)
        }
        Err(e) => skip(username, DeliveryStage::Post, e.to_string()),
    }
}

fn skip(username: &str, stage: DeliveryStage, reason: String) -> DeliveryResult {
    warn!(username, stage = %stage, error = %reason, "Skipping recipient");
    DeliveryResult::skipped(username.to_string(), stage, reason)
}
