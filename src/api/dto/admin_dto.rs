//! Admin DTOs: occupancy stats, date filters, and schedule seeding.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DayStats, ScheduleRule, SlotRule};
use crate::error::GatewayError;

/// Occupancy row for `GET /admin/stats`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DayStatsDto {
    /// Calendar date.
    pub date: NaiveDate,
    /// Persons booked across all slots of the day.
    pub booked: i64,
    /// Stored day capacity (reporting denominator).
    pub capacity_day: i64,
    /// Occupancy percentage against the stored day capacity. May drift
    /// from slot-level availability when the seeded numbers diverge.
    pub percent: i64,
}

impl From<DayStats> for DayStatsDto {
    fn from(stats: DayStats) -> Self {
        let percent = if stats.capacity_day > 0 {
            stats.booked * 100 / stats.capacity_day
        } else {
            0
        };
        Self {
            date: stats.date,
            booked: stats.booked,
            capacity_day: stats.capacity_day,
            percent,
        }
    }
}

/// Query parameters for `GET /admin/bookings`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BookingsFilterParams {
    /// Restrict the listing to one date; omit for all bookings.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// One seeded slot in a schedule replace request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SlotRuleDto {
    /// Start time as 24-hour `HH:MM`.
    pub time: String,
    /// Slot capacity in persons.
    pub capacity: i64,
}

/// One day in a schedule replace request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ScheduleDayDto {
    /// Calendar date.
    pub date: NaiveDate,
    /// Explicit day capacity; defaults to the sum of slot capacities.
    #[serde(default)]
    pub capacity_day: Option<i64>,
    /// Slots to seed under the day.
    pub slots: Vec<SlotRuleDto>,
}

impl ScheduleDayDto {
    /// Converts the DTO into a seeding rule, parsing slot times.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for a time that is not
    /// 24-hour `HH:MM`.
    pub fn into_rule(self) -> Result<ScheduleRule, GatewayError> {
        let slots = self
            .slots
            .into_iter()
            .map(|slot| {
                let time = NaiveTime::parse_from_str(&slot.time, "%H:%M").map_err(|_| {
                    GatewayError::InvalidRequest(format!(
                        "invalid slot time {:?}, expected HH:MM",
                        slot.time
                    ))
                })?;
                Ok(SlotRule {
                    time,
                    capacity: slot.capacity,
                })
            })
            .collect::<Result<Vec<_>, GatewayError>>()?;
        Ok(ScheduleRule {
            date: self.date,
            capacity_day: self.capacity_day,
            slots,
        })
    }
}

/// Request body for `PUT /admin/schedule`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReplaceScheduleRequest {
    /// Full future schedule; replaces everything currently seeded.
    pub days: Vec<ScheduleDayDto>,
}

/// Response body for `PUT /admin/schedule`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReplaceScheduleResponse {
    /// Number of days seeded.
    pub days: usize,
    /// Number of time slots seeded.
    pub time_slots: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_percent_uses_stored_day_capacity() {
        let dto = DayStatsDto::from(DayStats {
            date: NaiveDate::from_ymd_opt(2026, 2, 16).unwrap_or_default(),
            booked: 15,
            capacity_day: 60,
        });
        assert_eq!(dto.percent, 25);
    }

    #[test]
    fn stats_percent_guards_zero_capacity() {
        let dto = DayStatsDto::from(DayStats {
            date: NaiveDate::from_ymd_opt(2026, 2, 16).unwrap_or_default(),
            booked: 5,
            capacity_day: 0,
        });
        assert_eq!(dto.percent, 0);
    }

    #[test]
    fn schedule_day_rejects_malformed_time() {
        let dto = ScheduleDayDto {
            date: NaiveDate::from_ymd_opt(2026, 2, 16).unwrap_or_default(),
            capacity_day: None,
            slots: vec![SlotRuleDto {
                time: "25:99".to_string(),
                capacity: 30,
            }],
        };
        assert!(matches!(
            dto.into_rule(),
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[test]
    fn schedule_day_parses_times() {
        let dto = ScheduleDayDto {
            date: NaiveDate::from_ymd_opt(2026, 2, 16).unwrap_or_default(),
            capacity_day: None,
            slots: vec![SlotRuleDto {
                time: "09:00".to_string(),
                capacity: 30,
            }],
        };
        let Ok(rule) = dto.into_rule() else {
            unreachable!("valid time must parse");
        };
        assert_eq!(rule.effective_day_capacity(), 30);
    }
}
