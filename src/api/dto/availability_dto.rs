//! Availability DTOs for the day and slot listings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DayAvailability, DayId, SlotAvailability, SlotId};

/// Query parameters for the availability listings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PartySizeParams {
    /// Requested party size, >= 1.
    pub persons: i64,
}

/// One day in `GET /availability/days`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableDayDto {
    /// Day identifier for the follow-up slot listing.
    pub day_id: DayId,
    /// Calendar date.
    pub date: NaiveDate,
    /// Day-level remaining estimate (display only).
    pub remaining: i64,
}

impl From<DayAvailability> for AvailableDayDto {
    fn from(day: DayAvailability) -> Self {
        Self {
            day_id: day.day_id,
            date: day.date,
            remaining: day.remaining,
        }
    }
}

/// One slot in `GET /availability/days/{day_id}/slots`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableSlotDto {
    /// Slot identifier for the reservation request.
    pub time_slot_id: SlotId,
    /// Start time as 24-hour `HH:MM`.
    pub time: String,
    /// Live remaining capacity.
    pub remaining: i64,
}

impl From<SlotAvailability> for AvailableSlotDto {
    fn from(slot: SlotAvailability) -> Self {
        Self {
            time_slot_id: slot.time_slot_id,
            time: slot.time.format("%H:%M").to_string(),
            remaining: slot.remaining,
        }
    }
}
