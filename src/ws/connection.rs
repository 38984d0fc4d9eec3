//! WebSocket connection loop for the notification feed.
//!
//! Forwards notifications from the [`broadcast::Receiver`] to the
//! client as JSON frames until either side disconnects.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::FeedFrame;
use crate::domain::Notification;

/// Runs the forward loop for a single feed connection.
///
/// - Forwards every notification from the bus as one text frame.
/// - Reads from the client only to observe close frames; the feed
///   accepts no commands.
pub async fn run_connection(socket: WebSocket, mut notification_rx: broadcast::Receiver<Notification>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
            // Notification from the bus
            notification = notification_rx.recv() => {
                match notification {
                    Ok(notification) => {
                        let frame = FeedFrame::new(notification);
                        let json = serde_json::to_string(&frame).unwrap_or_default();
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "feed client lagged behind notification bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("notification feed connection closed");
}
