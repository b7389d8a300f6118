use std::time::Duration;

use dotenvy::dotenv;
use reqwest::Url;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub mattermost_url: String,
    pub mattermost_token: String,
    pub mattermost_bot_user_id: String,

    pub gitlab_url: String,
    pub gitlab_token: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    #[serde(default = "default_dispatch_concurrency")]
    pub dispatch_concurrency: usize,

    /// Disables TLS certificate verification for every outbound call.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_attachment_color")]
    pub attachment_color: String,
}

fn default_server_port() -> u16 {
    8080
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_dispatch_concurrency() -> usize {
    4
}

fn default_attachment_color() -> String {
    "#db3b21".to_string()
}

impl Config {
    /// Reads the environment (and `.env`, when present) into a validated config.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();

        let config = envy::from_env::<Self>()?;
        config.validate()
    }

    /// Like `load`, but values in `.env` win over the current environment so edits to the
    /// file take effect.
    pub fn reload() -> Result<Self, ConfigError> {
        dotenvy::dotenv_override().ok();

        let config = envy::from_env::<Self>()?;
        config.validate()
    }

    /// Checks every field and normalises base URLs, consuming the raw config.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.mattermost_url = normalize_base_url("MATTERMOST_URL", &self.mattermost_url)?;
        self.gitlab_url = normalize_base_url("GITLAB_URL", &self.gitlab_url)?;

        require_non_empty("MATTERMOST_TOKEN", &self.mattermost_token)?;
        require_non_empty("MATTERMOST_BOT_USER_ID", &self.mattermost_bot_user_id)?;
        require_non_empty("GITLAB_TOKEN", &self.gitlab_token)?;

        if !(1..=300).contains(&self.request_timeout_seconds) {
            return Err(ConfigError::OutOfRange {
                name: "REQUEST_TIMEOUT_SECONDS",
                reason: format!("{} is not within 1..=300", self.request_timeout_seconds),
            });
        }

        if self.dispatch_concurrency == 0 {
            return Err(ConfigError::OutOfRange {
                name: "DISPATCH_CONCURRENCY",
                reason: "must be at least 1".to_string(),
            });
        }

        if !is_hex_color(&self.attachment_color) {
            return Err(ConfigError::OutOfRange {
                name: "ATTACHMENT_COLOR",
                reason: format!("'{}' is not a #rrggbb colour", self.attachment_color),
            });
        }

        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn require_non_empty(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty { name });
    }
    Ok(())
}

fn normalize_base_url(name: &'static str, value: &str) -> Result<String, ConfigError> {
    require_non_empty(name, value)?;

    let trimmed = value.trim().trim_end_matches('/');
    let invalid = || ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
    };

    let url = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }

    Ok(trimmed.to_string())
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
