//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws/notifications` — Upgrade HTTP connection to WebSocket.
///
/// The subscription is created before the upgrade completes, so no
/// notification published after the handshake is lost.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let notification_rx = state.notifications.subscribe();

    ws.on_upgrade(move |socket| run_connection(socket, notification_rx))
}
