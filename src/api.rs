use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    clients::health::HealthChecker,
    models::{delivery::ProcessingReport, health::HealthStatus, response::ApiResponse},
    relay::RelayHandle,
    utils::process_event,
};

pub struct AppState {
    relay: RelayHandle,
}

pub fn router(relay: RelayHandle) -> Router {
    let state = Arc::new(AppState { relay });

    Router::new()
        .route("/", post(receive_webhook))
        .route("/webhook", post(receive_webhook))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(relay: RelayHandle) -> Result<(), Box<dyn std::error::Error>> {
    let port = relay.current().config.server_port;
    let app = router(relay);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Webhook server started");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Always answers 200: the sender gets a summary, never a delivery error.
async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let trace_id = headers
        .get("x-gitlab-event-uuid")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let raw = match serde_json::from_slice::<Value>(&body) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(trace_id = %trace_id, error = %e, "Webhook body is not valid JSON");
            return (
                StatusCode::OK,
                Json(ApiResponse::<ProcessingReport>::error(
                    e.to_string(),
                    "Event ignored".to_string(),
                )),
            );
        }
    };

    let relay = state.relay.current();
    let report = process_event(&raw, &relay, &trace_id).await;

    let message = match report.ignored_reason {
        Some(_) => "Event ignored",
        None => "Event processed",
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(report, message.to_string())),
    )
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let relay = state.relay.current();
    let health = HealthChecker::new(&relay.mattermost, &relay.gitlab)
        .check_all()
        .await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}
