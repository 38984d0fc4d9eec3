//! Service layer: business logic orchestration.
//!
//! [`BookingService`] coordinates booking operations, delegates all
//! durable state to the [`crate::persistence::store::BookingStore`], and
//! emits cancellation notices through the
//! [`crate::domain::NotificationBus`].

pub mod booking_service;

pub use booking_service::BookingService;
