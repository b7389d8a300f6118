use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::ChatApiError,
    models::{
        mattermost::{
            CreatePost, MattermostChannel, MattermostError, MattermostPost, MattermostUser,
            PostProps, SlackAttachment,
        },
        payload::NotificationPayload,
    },
};

#[derive(Clone)]
pub struct MattermostClient {
    http_client: Client,
    base_url: String,
    token: String,
    bot_user_id: String,
    attachment_color: String,
}

impl MattermostClient {
    pub fn new(config: &Config, http_client: Client) -> Self {
        info!(base_url = %config.mattermost_url, "Mattermost client initialized");

        Self {
            http_client,
            base_url: config.mattermost_url.clone(),
            token: config.mattermost_token.clone(),
            bot_user_id: config.mattermost_bot_user_id.clone(),
            attachment_color: config.attachment_color.clone(),
        }
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<MattermostUser, ChatApiError> {
        let url = format!("{}/api/v4/users/username/{}", self.base_url, username);

        debug!(username, "Resolving Mattermost user");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Mattermost returns the existing channel when the pair already has one.
    pub async fn create_direct_channel(&self, user_id: &str) -> Result<MattermostChannel, ChatApiError> {
        let url = format!("{}/api/v4/channels/direct", self.base_url);

        debug!(user_id, "Opening direct channel");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&[self.bot_user_id.as_str(), user_id])
            .send()
            .await?;

        Self::parse(response).await
    }

    pub async fn create_post(
        &self,
        channel_id: &str,
        payload: &NotificationPayload,
    ) -> Result<MattermostPost, ChatApiError> {
        let url = format!("{}/api/v4/posts", self.base_url);

        let post = CreatePost {
            channel_id: channel_id.to_string(),
            user_id: self.bot_user_id.clone(),
            message: payload.message.clone(),
            props: PostProps {
                attachments: vec![SlackAttachment {
                    fallback: payload.message.clone(),
                    color: self.attachment_color.clone(),
                    title: payload.title.clone(),
                    title_link: payload.title_link.clone(),
                    text: payload.text.clone(),
                }],
            },
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&post)
            .send()
            .await?;

        Self::parse(response).await
    }

    pub async fn ping(&self) -> Result<(), ChatApiError> {
        let url = format!("{}/api/v4/system/ping", self.base_url);

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(ChatApiError::Status {
                status,
                message: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ChatApiError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ChatApiError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MattermostError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        Err(ChatApiError::Status { status, message })
    }
}
