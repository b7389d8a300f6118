use reqwest::StatusCode;
use thiserror::Error;

/// Why an inbound webhook body could not be turned into a `NotificationEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("event has no object_kind")]
    MissingKind,

    #[error("unsupported object_kind '{0}'")]
    UnsupportedKind(String),

    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("field '{path}' is not {expected}")]
    InvalidField { path: String, expected: &'static str },

    #[error("unsupported noteable_type '{0}'")]
    UnsupportedNoteable(String),
}

impl DecodeError {
    /// Events we simply do not handle, as opposed to events we handle but could not read.
    pub fn is_ignored(&self) -> bool {
        matches!(self, DecodeError::MissingKind | DecodeError::UnsupportedKind(_))
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("GitLab request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitLab returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse GitLab response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ChatApiError {
    #[error("Mattermost request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mattermost returned status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Failed to parse Mattermost response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid or missing environmental variable: {0}")]
    Environment(#[from] envy::Error),

    #[error("{name} must not be empty")]
    Empty { name: &'static str },

    #[error("{name} is not a valid http(s) URL: {value}")]
    InvalidUrl { name: &'static str, value: String },

    #[error("{name} is out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
