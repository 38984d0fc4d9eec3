//! WebSocket frame types for the notification feed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Notification;

/// Server → Client frame carrying one notification.
///
/// The feed is one-way; clients only read. The envelope adds a server
/// timestamp so delivery lag is visible to the consumer.
#[derive(Debug, Clone, Serialize)]
pub struct FeedFrame {
    /// Frame type discriminator, always `"notification"`.
    #[serde(rename = "type")]
    pub frame_type: FrameType,
    /// Time the frame was emitted.
    pub timestamp: DateTime<Utc>,
    /// The notification payload to deliver.
    pub notification: Notification,
}

/// Discriminator for feed frame types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameType {
    /// An outbound user notification.
    Notification,
}

impl FeedFrame {
    /// Wraps a notification in a feed frame stamped with the current time.
    #[must_use]
    pub fn new(notification: Notification) -> Self {
        Self {
            frame_type: FrameType::Notification,
            timestamp: Utc::now(),
            notification,
        }
    }
}
