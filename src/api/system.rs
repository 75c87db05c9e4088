//! System endpoint: health check.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Serialize;

use crate::app_state::AppState;
use crate::domain::ConnectionEntry;

/// Path that answers non-upgrade `GET` requests with [`HealthResponse`].
pub const HEALTH_PATH: &str = "/health";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the server is accepting.
    pub status: String,
    /// RFC 3339 timestamp of the report.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
    /// Currently open WebSocket connections.
    pub connections: usize,
    /// Messages acknowledged since startup.
    pub messages_handled: u64,
    /// Every open connection, oldest first.
    pub open: Vec<ConnectionEntry>,
}

/// `GET /health` — Service health status.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let open = state.registry.list().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            connections: open.len(),
            messages_handled: state.registry.messages_handled(),
            open,
        }),
    )
}
