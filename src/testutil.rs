//! Shared fixtures for inline tests.
//!
//! Tests run against a real on-disk SQLite database in a temp directory
//! so the `BEGIN IMMEDIATE` admission path is exercised across multiple
//! pooled connections, exactly as in production.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tempfile::TempDir;

use crate::domain::{DayId, ReservationRequest, ScheduleRule, SlotId, SlotRule, UserId};
use crate::persistence::store::BookingStore;

pub(crate) async fn open_store() -> (TempDir, BookingStore) {
    let Ok(dir) = tempfile::tempdir() else {
        panic!("failed to create temp dir");
    };
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("test.db"))
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(30));
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await;
    let Ok(pool) = pool else {
        panic!("failed to open test database");
    };
    let store = BookingStore::new(pool);
    let Ok(()) = store.init_schema().await else {
        panic!("failed to initialize schema");
    };
    (dir, store)
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        panic!("invalid test date {year}-{month}-{day}");
    };
    date
}

pub(crate) fn time(hour: u32, minute: u32) -> NaiveTime {
    let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
        panic!("invalid test time {hour}:{minute}");
    };
    time
}

/// Builds a seeding rule; `slots` entries are `(hour, minute, capacity)`.
pub(crate) fn day_rule(day_date: NaiveDate, slots: &[(u32, u32, i64)]) -> ScheduleRule {
    ScheduleRule {
        date: day_date,
        capacity_day: None,
        slots: slots
            .iter()
            .map(|&(hour, minute, capacity)| SlotRule {
                time: time(hour, minute),
                capacity,
            })
            .collect(),
    }
}

pub(crate) fn request(
    user: i64,
    name: &str,
    phone: Option<&str>,
    persons: i64,
    day_id: DayId,
    time_slot_id: SlotId,
) -> ReservationRequest {
    ReservationRequest {
        user_id: UserId::new(user),
        name: name.to_string(),
        phone: phone.map(str::to_string),
        persons,
        day_id,
        time_slot_id,
    }
}
