//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};

use super::connection::{ConnectionContext, run_connection};
use crate::api::system::{HEALTH_PATH, health_handler};
use crate::app_state::AppState;

/// Entry point for every request, on every path.
///
/// - Upgrade requests become a connection regardless of path.
/// - `GET /health` without upgrade headers returns the health report.
/// - Anything else gets the upgrade rejection (400/405/426).
pub async fn ws_handler(
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    method: Method,
    uri: Uri,
    State(state): State<AppState>,
) -> Response {
    match upgrade {
        Ok(ws) => {
            let ctx = ConnectionContext::new(uri.path(), &state);
            ws.on_failed_upgrade(|e| tracing::warn!(error = %e, "websocket upgrade failed"))
                .on_upgrade(move |socket| run_connection(socket, ctx))
        }
        Err(_) if method == Method::GET && uri.path() == HEALTH_PATH => {
            health_handler(State(state)).await.into_response()
        }
        Err(rejection) => {
            tracing::debug!(path = %uri.path(), %rejection, "rejected non-websocket request");
            rejection.into_response()
        }
    }
}
