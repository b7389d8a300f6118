use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::{
    clients::{gitlab::GitLabClient, http::build_http_client, mattermost::MattermostClient},
    config::Config,
    error::ConfigError,
};

/// One immutable configuration together with the clients built from it.
pub struct Relay {
    pub config: Config,
    pub mattermost: MattermostClient,
    pub gitlab: GitLabClient,
}

impl Relay {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let http_client = build_http_client(&config)?;

        Ok(Self {
            mattermost: MattermostClient::new(&config, http_client.clone()),
            gitlab: GitLabClient::new(&config, http_client),
            config,
        })
    }
}

/// Shared access to the active `Relay`.
///
/// Requests take a snapshot with `current()` and keep it for their whole lifetime; a reload
/// swaps in a fully built replacement and never mutates the one in use.
#[derive(Clone)]
pub struct RelayHandle {
    inner: Arc<RwLock<Arc<Relay>>>,
}

impl RelayHandle {
    pub fn new(relay: Relay) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(relay))),
        }
    }

    pub fn current(&self) -> Arc<Relay> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Builds a relay from `config` and makes it current. On error the active relay is kept.
    pub fn reload(&self, config: Config) -> Result<(), ConfigError> {
        let relay = match Relay::new(config) {
            Ok(relay) => Arc::new(relay),
            Err(e) => {
                warn!(error = %e, "Configuration rejected, keeping previous configuration");
                return Err(e);
            }
        };

        match self.inner.write() {
            Ok(mut guard) => *guard = relay,
            Err(poisoned) => *poisoned.into_inner() = relay,
        }

        info!("Configuration reloaded");
        Ok(())
    }
}
