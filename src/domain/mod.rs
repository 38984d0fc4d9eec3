//! Domain layer: typed records, identifiers, validation, and the
//! notification bus.
//!
//! The records here are the server-side model of the booking core:
//! schedule rows ([`Day`], [`TimeSlot`]), the ledger read view
//! ([`BookingDetails`]), derived availability views, and the identifiers
//! that link them.

pub mod ids;
pub mod notification;
pub mod records;
pub mod validate;

pub use ids::{BookingId, DayId, SlotId, UserId};
pub use notification::{Notification, NotificationBus, NotificationKind};
pub use records::{
    BookingConfirmation, BookingDetails, Day, DayAvailability, DayStats, PendingReminder,
    ReservationRequest, ScheduleRule, SlotAvailability, SlotRule, TimeSlot,
};
