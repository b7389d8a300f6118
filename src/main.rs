use anyhow::{Error, Result, anyhow};
use gitlab_dm_relay::{
    api::run_api_server,
    config::Config,
    relay::{Relay, RelayHandle},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = Config::load()?;
    let handle = RelayHandle::new(Relay::new(config)?);

    info!("Configuration validated. Relay is ready to start.");

    spawn_reload_listener(handle.clone());

    run_api_server(handle)
        .await
        .map_err(|e| anyhow!("Webhook server failed: {}", e))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(unix)]
fn spawn_reload_listener(handle: RelayHandle) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(hangup) => hangup,
            Err(e) => {
                error!(error = %e, "Failed to install SIGHUP handler, reload disabled");
                return;
            }
        };

        while hangup.recv().await.is_some() {
            info!("SIGHUP received, reloading configuration");

            let result = Config::reload().and_then(|config| handle.reload(config));
            if let Err(e) = result {
                error!(error = %e, "Configuration reload failed");
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_listener(_handle: RelayHandle) {}
