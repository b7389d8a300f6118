use std::{collections::HashMap, time::Instant};

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    clients::{gitlab::GitLabClient, mattermost::MattermostClient},
    models::health::{HealthCheckResponse, HealthStatus, ServiceHealth},
};

pub struct HealthChecker<'a> {
    mattermost: &'a MattermostClient,
    gitlab: &'a GitLabClient,
}

impl<'a> HealthChecker<'a> {
    pub fn new(mattermost: &'a MattermostClient, gitlab: &'a GitLabClient) -> Self {
        Self { mattermost, gitlab }
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        let (mattermost_health, gitlab_health) =
            tokio::join!(self.check_mattermost(), self.check_gitlab());

        checks.insert("mattermost".to_string(), mattermost_health);
        checks.insert("gitlab".to_string(), gitlab_health);

        let overall_status = determine_overall_status(&checks);

        HealthCheckResponse {
            status: overall_status,
            timestamp: Utc::now(),
            checks,
        }
    }

    async fn check_mattermost(&self) -> ServiceHealth {
        let start = Instant::now();

        match self.mattermost.ping().await {
            Ok(_) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "Mattermost health check passed");
                ServiceHealth::healthy(elapsed)
            }
            Err(e) => {
                warn!(error = %e, "Mattermost health check failed");
                ServiceHealth::unhealthy(format!("Ping failed: {}", e))
            }
        }
    }

    /// Only note notifications depend on GitLab, so an outage there degrades the relay.
    async fn check_gitlab(&self) -> ServiceHealth {
        let start = Instant::now();

        match self.gitlab.version().await {
            Ok(_) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "GitLab health check passed");
                ServiceHealth::healthy(elapsed)
            }
            Err(e) => {
                warn!(error = %e, "GitLab health check failed");
                ServiceHealth::degraded(format!("Version check failed: {}", e))
            }
        }
    }
}

fn determine_overall_status(checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
    let has_unhealthy = checks
        .values()
        .any(|health| health.status == HealthStatus::Unhealthy);

    let has_degraded = checks
        .values()
        .any(|health| health.status == HealthStatus::Degraded);

    if has_unhealthy {
        HealthStatus::Unhealthy
    } else if has_degraded {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}
