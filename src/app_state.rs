//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::NotificationBus;
use crate::service::BookingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking service for all business logic.
    pub booking_service: Arc<BookingService>,
    /// Notification bus for the WebSocket delivery feed.
    pub notifications: NotificationBus,
}
