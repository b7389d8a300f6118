use reqwest::Client;
use tracing::warn;

use crate::{config::Config, error::ConfigError};

/// Builds the client shared by every outbound call made under one configuration.
pub fn build_http_client(config: &Config) -> Result<Client, ConfigError> {
    if config.accept_invalid_certs {
        warn!("TLS certificate verification is disabled for outbound requests");
    }

    let client = Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(config.request_timeout())
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()?;

    Ok(client)
}
