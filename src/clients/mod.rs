pub mod gitlab;
pub mod health;
pub mod http;
pub mod mattermost;
