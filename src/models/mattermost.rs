use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct MattermostUser {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MattermostChannel {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackAttachment {
    pub fallback: String,
    pub color: String,
    pub title: String,
    pub title_link: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostProps {
    pub attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePost {
    pub channel_id: String,
    pub user_id: String,
    pub message: String,
    pub props: PostProps,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MattermostPost {
    pub id: String,
    pub channel_id: String,
}

/// Body Mattermost returns alongside 4xx/5xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct MattermostError {
    pub message: String,

    #[serde(default)]
    pub id: Option<String>,
}
