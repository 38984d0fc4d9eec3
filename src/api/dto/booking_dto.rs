//! Booking DTOs for reservation and lookup.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    BookingConfirmation, BookingDetails, BookingId, DayId, ReservationRequest, SlotId, UserId,
};

/// Request body for `POST /bookings`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Requester identity supplied by the front-end.
    pub user_id: UserId,
    /// Display name for the booking.
    pub name: String,
    /// Raw phone string; normalized server-side. Optional.
    #[serde(default)]
    pub phone: Option<String>,
    /// Party size, >= 1.
    pub persons: i64,
    /// Chosen day.
    pub day_id: DayId,
    /// Chosen slot under that day.
    pub time_slot_id: SlotId,
}

impl From<CreateBookingRequest> for ReservationRequest {
    fn from(req: CreateBookingRequest) -> Self {
        Self {
            user_id: req.user_id,
            name: req.name,
            phone: req.phone,
            persons: req.persons,
            day_id: req.day_id,
            time_slot_id: req.time_slot_id,
        }
    }
}

/// Response body for `POST /bookings` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingConfirmationDto {
    /// New booking identifier.
    pub booking_id: BookingId,
    /// Confirmed excursion date.
    pub date: NaiveDate,
    /// Confirmed excursion time as `HH:MM`.
    pub time: String,
}

impl From<BookingConfirmation> for BookingConfirmationDto {
    fn from(confirmation: BookingConfirmation) -> Self {
        Self {
            booking_id: confirmation.booking_id,
            date: confirmation.date,
            time: confirmation.time.format("%H:%M").to_string(),
        }
    }
}

/// A booking as returned by lookup and admin listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    /// Booking identifier.
    pub id: BookingId,
    /// Requester identity.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized phone, if provided.
    pub phone: Option<String>,
    /// Party size.
    pub persons: i64,
    /// Excursion date.
    pub date: NaiveDate,
    /// Excursion time as `HH:MM`.
    pub time: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<BookingDetails> for BookingDto {
    fn from(details: BookingDetails) -> Self {
        Self {
            id: details.id,
            user_id: details.user_id,
            name: details.name,
            phone: details.phone,
            persons: details.persons,
            date: details.date,
            time: details.time.format("%H:%M").to_string(),
            created_at: details.created_at,
        }
    }
}
