//! HTTP status endpoint.
//!
//! `/health` and `/ready` answer 200 while the caster link is up and 503
//! otherwise, with the current status as JSON. `/live` answers 200 as long
//! as the process serves requests.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use ntrip_relay::{SharedStatus, StatusSnapshot};
use tracing::info;

/// Health status.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthStatus {
    /// Whether the relay is streaming from the caster.
    pub healthy: bool,
    /// Total correction bytes relayed.
    pub bytes_relayed: u64,
    /// Failed attempts since the last successful connect.
    pub retry_count: u32,
    /// Fix-quality category of the last position.
    pub fix_quality: String,
    /// Last position sentence, once one has been received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_position: Option<String>,
}

impl From<StatusSnapshot> for HealthStatus {
    fn from(snapshot: StatusSnapshot) -> Self {
        Self {
            healthy: snapshot.connected,
            bytes_relayed: snapshot.byte_counter,
            retry_count: snapshot.retry_count,
            fix_quality: snapshot.fix_quality().label().to_string(),
            last_position: Some(snapshot.last_position).filter(|p| !p.is_empty()),
        }
    }
}

/// Health check handler.
async fn health_handler(State(status): State<Arc<SharedStatus>>) -> impl IntoResponse {
    let health = HealthStatus::from(status.snapshot());
    let code = if health.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(health))
}

/// Readiness handler (same as health).
async fn ready_handler(state: State<Arc<SharedStatus>>) -> impl IntoResponse {
    health_handler(state).await
}

/// Liveness handler (always returns OK if the server is running).
async fn live_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Routes of the status endpoint.
pub fn router(status: Arc<SharedStatus>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/live", get(live_handler))
        .with_state(status)
}

/// Serve the status endpoint on `bind_addr` until the runtime stops.
pub async fn start_health_server(bind_addr: SocketAddr, status: Arc<SharedStatus>) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = %listener.local_addr()?, "status endpoint listening");
    axum::serve(listener, router(status)).await
}
