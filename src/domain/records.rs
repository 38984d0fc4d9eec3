//! Typed records for schedule rows, bookings, and derived read views.
//!
//! Every struct here is constructed at the store boundary from explicit
//! column tuples. Remaining capacity is always a derived number computed
//! by aggregation in SQL, never a stored counter.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BookingId, DayId, SlotId, UserId};

/// A bookable calendar day with its aggregate capacity.
///
/// `capacity_day` is fixed at seed time. By seeding convention it equals
/// the sum of the day's slot capacities, but the core never re-validates
/// that and never uses it for admission gating; only the reporting view
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Row identifier.
    pub id: DayId,
    /// Calendar date, unique across days.
    pub date: NaiveDate,
    /// Aggregate day capacity in persons.
    pub capacity_day: i64,
}

/// A bookable time-of-day instance under one [`Day`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Row identifier.
    pub id: SlotId,
    /// Owning day.
    pub day_id: DayId,
    /// Start time of the slot.
    pub time: NaiveTime,
    /// Hard slot capacity in persons.
    pub capacity_time: i64,
}

/// A booking joined with its day date and slot time, as shown to users
/// and to the admin views.
///
/// This is the read representation of a ledger row; the write side only
/// ever inserts (admission) or deletes (cancellation), plus the monotonic
/// `reminder_sent` flag flip handled by the reminder queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingDetails {
    /// Booking row identifier.
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
    /// Excursion time.
    pub time: NaiveTime,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input tuple for the admission controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    /// Requester identity.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Phone in normalized form, if provided.
    pub phone: Option<String>,
    /// Party size, >= 1.
    pub persons: i64,
    /// Chosen day.
    pub day_id: DayId,
    /// Chosen slot under that day.
    pub time_slot_id: SlotId,
}

/// Result of a committed admission, for front-end display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    /// Identifier of the new booking row.
    pub booking_id: BookingId,
    /// Confirmed excursion date.
    pub date: NaiveDate,
    /// Confirmed excursion time.
    pub time: NaiveTime,
}

/// One day in the availability listing, with a day-level remaining
/// estimate (`capacity_day` minus all persons booked on the day).
///
/// The estimate is display-only; admission is gated per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayAvailability {
    /// Day identifier.
    pub day_id: DayId,
    /// Calendar date.
    pub date: NaiveDate,
    /// Day-level remaining estimate in persons.
    pub remaining: i64,
}

/// One slot in the availability listing with its live remaining capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotAvailability {
    /// Slot identifier.
    pub time_slot_id: SlotId,
    /// Slot start time.
    pub time: NaiveTime,
    /// Remaining capacity in persons.
    pub remaining: i64,
}

/// Occupancy row for the reporting boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayStats {
    /// Calendar date.
    pub date: NaiveDate,
    /// Persons booked across all slots of the day.
    pub booked: i64,
    /// Stored day capacity (reporting denominator only).
    pub capacity_day: i64,
}

/// A booking due for a reminder in the current sweep window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReminder {
    /// Booking row identifier.
    pub booking_id: BookingId,
    /// Identity to notify.
    pub user_id: UserId,
    /// Party size, echoed into the reminder text.
    pub persons: i64,
    /// Excursion date.
    pub date: NaiveDate,
    /// Excursion time.
    pub time: NaiveTime,
}

/// One seeded slot inside a [`ScheduleRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRule {
    /// Slot start time.
    pub time: NaiveTime,
    /// Slot capacity in persons.
    pub capacity: i64,
}

/// Seeding rule for one day of the schedule replace operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRule {
    /// Calendar date of the day.
    pub date: NaiveDate,
    /// Explicit day capacity; when absent the sum of slot capacities
    /// is stored, matching the seeding convention.
    pub capacity_day: Option<i64>,
    /// Slots to create under the day, in listing order.
    pub slots: Vec<SlotRule>,
}

impl ScheduleRule {
    /// Day capacity that will be stored for this rule.
    #[must_use]
    pub fn effective_day_capacity(&self) -> i64 {
        self.capacity_day
            .unwrap_or_else(|| self.slots.iter().map(|s| s.capacity).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
    }

    #[test]
    fn day_capacity_defaults_to_slot_sum() {
        let rule = ScheduleRule {
            date: NaiveDate::from_ymd_opt(2026, 2, 16).unwrap_or_default(),
            capacity_day: None,
            slots: vec![
                SlotRule {
                    time: t(11, 0),
                    capacity: 30,
                },
                SlotRule {
                    time: t(13, 0),
                    capacity: 30,
                },
            ],
        };
        assert_eq!(rule.effective_day_capacity(), 60);
    }

    #[test]
    fn explicit_day_capacity_wins_over_slot_sum() {
        let rule = ScheduleRule {
            date: NaiveDate::from_ymd_opt(2026, 2, 16).unwrap_or_default(),
            capacity_day: Some(45),
            slots: vec![SlotRule {
                time: t(11, 0),
                capacity: 30,
            }],
        };
        assert_eq!(rule.effective_day_capacity(), 45);
    }
}
