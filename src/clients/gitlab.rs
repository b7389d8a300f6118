use reqwest::Client;
use tracing::{debug, info};

use crate::{config::Config, error::LookupError, models::gitlab::GitLabDiscussion};

const PER_PAGE: u32 = 100;
const MAX_PAGES: u32 = 50;

#[derive(Clone)]
pub struct GitLabClient {
    http_client: Client,
    base_url: String,
    token: String,
}

impl GitLabClient {
    pub fn new(config: &Config, http_client: Client) -> Self {
        info!(base_url = %config.gitlab_url, "GitLab client initialized");

        Self {
            http_client,
            base_url: config.gitlab_url.clone(),
            token: config.gitlab_token.clone(),
        }
    }

    /// Distinct authors of human (non-system) notes on a merge request, in order of first
    /// appearance.
    pub async fn find_participants(
        &self,
        project_id: u64,
        merge_request_iid: u64,
    ) -> Result<Vec<String>, LookupError> {
        let mut participants: Vec<String> = Vec::new();

        for discussion in self.list_discussions(project_id, merge_request_iid).await? {
            for note in discussion.notes.iter().filter(|note| !note.system) {
                if !participants.contains(&note.author.username) {
                    participants.push(note.author.username.clone());
                }
            }
        }

        debug!(
            project_id,
            merge_request_iid,
            participants = participants.len(),
            "Merge request participants resolved"
        );

        Ok(participants)
    }

    pub async fn list_discussions(
        &self,
        project_id: u64,
        merge_request_iid: u64,
    ) -> Result<Vec<GitLabDiscussion>, LookupError> {
        let url = format!(
            "{}/api/v4/projects/{}/merge_requests/{}/discussions",
            self.base_url, project_id, merge_request_iid
        );

        let mut discussions = Vec::new();
        let mut page = 1;

        loop {
            let response = self
                .http_client
                .get(&url)
                .header("PRIVATE-TOKEN", &self.token)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LookupError::Status { status, body });
            }

            let next_page = response
                .headers()
                .get("x-next-page")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u32>().ok());

            let batch: Vec<GitLabDiscussion> = response
                .json()
                .await
                .map_err(|e| LookupError::Decode(e.to_string()))?;

            debug!(page, discussions = batch.len(), "Fetched merge request discussions page");
            discussions.extend(batch);

            match next_page {
                Some(next) if next > page && next <= MAX_PAGES => page = next,
                _ => break,
            }
        }

        Ok(discussions)
    }

    pub async fn version(&self) -> Result<(), LookupError> {
        let url = format!("{}/api/v4/version", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(LookupError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}
