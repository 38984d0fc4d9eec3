//! Broadcast channel for outbound user notifications.
//!
//! [`NotificationBus`] wraps a [`tokio::sync::broadcast`] channel. The
//! core publishes `(identity, message)` payloads here; the external
//! delivery channel (the chat front-end) subscribes over WebSocket and
//! performs the actual message delivery.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::ids::UserId;

/// Category of an outbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// An administrator cancelled the user's booking.
    AdminCancelled,
    /// The user's excursion is coming up within the reminder window.
    Reminder,
}

/// Payload handed to the external delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Identity to deliver to.
    pub user_id: UserId,
    /// Notification category.
    pub kind: NotificationKind,
    /// Pre-rendered message text.
    pub message: String,
}

/// Broadcast bus for [`Notification`]s.
///
/// Backed by a `tokio::broadcast` channel. A publish with zero attached
/// receivers counts as a failed delivery attempt; callers that require
/// delivery (the reminder job) must check the returned receiver count.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Creates a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a notification to all subscribers.
    ///
    /// Returns the number of receivers that got the payload; `0` means
    /// no delivery channel is currently attached.
    pub fn publish(&self, notification: Notification) -> usize {
        self.sender.send(notification).unwrap_or(0)
    }

    /// Creates a new receiver for future notifications.
    ///
    /// Each WebSocket delivery connection calls this once on connect.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Returns the current number of attached receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
