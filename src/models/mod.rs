pub mod delivery;
pub mod event;
pub mod gitlab;
pub mod health;
pub mod mattermost;
pub mod payload;
pub mod response;
pub mod validation;
