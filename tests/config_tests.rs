use anyhow::Result;
use gitlab_dm_relay::{
    config::Config,
    error::ConfigError,
    relay::{Relay, RelayHandle},
};

use crate::common::test_config;

fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn required_env() -> Vec<(String, String)> {
    env(&[
        ("MATTERMOST_URL", "https://chat.example.com/"),
        ("MATTERMOST_TOKEN", "token"),
        ("MATTERMOST_BOT_USER_ID", "bot"),
        ("GITLAB_URL", "https://gitlab.example.com"),
        ("GITLAB_TOKEN", "glpat"),
    ])
}

/// Test: Optional settings fall back to defaults and certificates stay verified
#[test]
fn test_defaults_are_applied() -> Result<()> {
    let config = envy::from_iter::<_, Config>(required_env())?.validate()?;

    assert_eq!(config.server_port, 8080);
    assert_eq!(config.request_timeout_seconds, 10);
    assert_eq!(config.dispatch_concurrency, 4);
    assert!(!config.accept_invalid_certs);
    assert_eq!(config.attachment_color, "#db3b21");
    assert_eq!(config.mattermost_url, "https://chat.example.com");

    Ok(())
}

/// Test: Missing required variables are rejected
#[test]
fn test_missing_variable_is_rejected() {
    let mut vars = required_env();
    vars.retain(|(k, _)| k != "GITLAB_TOKEN");

    assert!(envy::from_iter::<_, Config>(vars).is_err());
}

/// Test: Invalid values fail validation
#[test]
fn test_invalid_values_are_rejected() {
    let base = test_config("https://chat.example.com", "https://gitlab.example.com");

    let mut config = base.clone();
    config.mattermost_url = "chat.example.com".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));

    let mut config = base.clone();
    config.gitlab_url = "ftp://gitlab.example.com".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));

    let mut config = base.clone();
    config.mattermost_token = "  ".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::Empty { .. })));

    let mut config = base.clone();
    config.request_timeout_seconds = 0;
    assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));

    let mut config = base.clone();
    config.dispatch_concurrency = 0;
    assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));

    let mut config = base;
    config.attachment_color = "red".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));
}

/// Test: A rejected reload keeps the previous configuration in effect
#[test]
fn test_invalid_reload_keeps_previous_config() -> Result<()> {
    let handle = RelayHandle::new(Relay::new(test_config(
        "https://chat.example.com",
        "https://gitlab.example.com",
    ))?);

    let mut broken = test_config("https://chat.example.com", "https://gitlab.example.com");
    broken.mattermost_bot_user_id = String::new();

    assert!(handle.reload(broken).is_err());
    assert_eq!(handle.current().config.mattermost_bot_user_id, "bot-user-id");

    Ok(())
}

/// Test: A reload swaps the whole configuration without touching earlier snapshots
#[test]
fn test_reload_replaces_config_atomically() -> Result<()> {
    let handle = RelayHandle::new(Relay::new(test_config(
        "https://chat.example.com",
        "https://gitlab.example.com",
    ))?);
    let before = handle.current();

    let mut next = test_config("https://chat2.example.com", "https://gitlab2.example.com");
    next.dispatch_concurrency = 8;
    handle.reload(next)?;

    let after = handle.current();
    assert_eq!(after.config.mattermost_url, "https://chat2.example.com");
    assert_eq!(after.config.dispatch_concurrency, 8);

    assert_eq!(before.config.mattermost_url, "https://chat.example.com");
    assert_eq!(before.config.dispatch_concurrency, 4);

    Ok(())
}
