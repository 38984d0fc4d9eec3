//! # excursion-gateway
//!
//! REST API and WebSocket gateway for a fixed-capacity excursion
//! booking core.
//!
//! The core manages a schedule of excursion days and time slots, each
//! with a fixed number of seats, and admits reservations under an
//! exclusive transaction so a slot is never overbooked. Outbound user
//! notifications (admin cancellations, reminders) are published on a
//! broadcast bus and delivered by whatever front-end attaches to the
//! WebSocket feed.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── Notification feed (ws/)
//!     │
//!     ├── BookingService (service/)
//!     ├── NotificationBus (domain/)
//!     ├── Reminder job (jobs/)
//!     │
//!     └── BookingStore / SQLite (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod jobs;
pub mod persistence;
pub mod service;
pub mod ws;

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod testutil;
