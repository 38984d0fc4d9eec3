//! SQLite implementation of the schedule store and reservation ledger.
//!
//! All capacity numbers are derived by aggregation at query time; no
//! remaining-seats counter is ever stored, so cancellation frees capacity
//! implicitly and counters cannot drift.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::sqlite::SqliteConnection;
use sqlx::{Connection, SqlitePool};

use crate::domain::{
    BookingConfirmation, BookingDetails, BookingId, Day, DayAvailability, DayId, DayStats,
    PendingReminder, ReservationRequest, ScheduleRule, SlotAvailability, SlotId, TimeSlot, UserId,
};
use crate::error::GatewayError;

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M";

/// SQLite-backed schedule store and reservation ledger.
///
/// Cheap to clone; all clones share the same connection pool. The pool
/// is injected at construction so components never reach for a global
/// handle.
#[derive(Debug, Clone)]
pub struct BookingStore {
    pool: SqlitePool,
}

impl BookingStore {
    /// Creates a new store over the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the schedule and ledger tables if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn init_schema(&self) -> Result<(), GatewayError> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS days (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL UNIQUE,
                capacity_day INTEGER NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS time_slots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                day_id INTEGER NOT NULL,
                time TEXT NOT NULL,
                capacity_time INTEGER NOT NULL,
                FOREIGN KEY (day_id) REFERENCES days(id)
            )",
            "CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                persons INTEGER NOT NULL,
                day_id INTEGER NOT NULL,
                time_slot_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                reminder_sent INTEGER DEFAULT 0,
                phone TEXT,
                FOREIGN KEY (day_id) REFERENCES days(id),
                FOREIGN KEY (time_slot_id) REFERENCES time_slots(id)
            )",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_user ON bookings(user_id)",
            "CREATE INDEX IF NOT EXISTS idx_bookings_day_id ON bookings(day_id)",
            "CREATE INDEX IF NOT EXISTS idx_bookings_time_slot_id ON bookings(time_slot_id)",
        ];
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(GatewayError::store)?;
        }
        Ok(())
    }

    // ── Schedule seeding ────────────────────────────────────────────────

    /// Replaces the entire schedule with the given rules.
    ///
    /// Destructive full-table reset followed by bulk insert, inside one
    /// transaction, never a merge. Must be run while no admissions are
    /// in flight; existing bookings keep their referential integrity, so
    /// a reset with live bookings fails instead of orphaning them.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure, including a
    /// foreign-key violation when bookings still reference the schedule.
    pub async fn replace_schedule(&self, rules: &[ScheduleRule]) -> Result<(), GatewayError> {
        let mut tx = self.pool.begin().await.map_err(GatewayError::store)?;

        sqlx::query("DELETE FROM time_slots")
            .execute(&mut *tx)
            .await
            .map_err(GatewayError::store)?;
        sqlx::query("DELETE FROM days")
            .execute(&mut *tx)
            .await
            .map_err(GatewayError::store)?;

        for rule in rules {
            let day_id = sqlx::query("INSERT INTO days (date, capacity_day) VALUES (?1, ?2)")
                .bind(rule.date.format(DATE_FMT).to_string())
                .bind(rule.effective_day_capacity())
                .execute(&mut *tx)
                .await
                .map_err(GatewayError::store)?
                .last_insert_rowid();

            for slot in &rule.slots {
                sqlx::query(
                    "INSERT INTO time_slots (day_id, time, capacity_time) VALUES (?1, ?2, ?3)",
                )
                .bind(day_id)
                .bind(slot.time.format(TIME_FMT).to_string())
                .bind(slot.capacity)
                .execute(&mut *tx)
                .await
                .map_err(GatewayError::store)?;
            }
        }

        tx.commit().await.map_err(GatewayError::store)?;
        Ok(())
    }

    // ── Schedule reads ──────────────────────────────────────────────────

    /// Fetches one day row.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn get_day(&self, day_id: DayId) -> Result<Option<Day>, GatewayError> {
        let row: Option<(i64, String, i64)> =
            sqlx::query_as("SELECT id, date, capacity_day FROM days WHERE id = ?1")
                .bind(day_id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(GatewayError::store)?;

        row.map(|(id, date, capacity_day)| {
            Ok(Day {
                id: DayId::new(id),
                date: parse_date(&date)?,
                capacity_day,
            })
        })
        .transpose()
    }

    /// Fetches all slots under a day, ordered by time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn get_slots_for_day(&self, day_id: DayId) -> Result<Vec<TimeSlot>, GatewayError> {
        let rows: Vec<(i64, i64, String, i64)> = sqlx::query_as(
            "SELECT id, day_id, time, capacity_time FROM time_slots
             WHERE day_id = ?1 ORDER BY time",
        )
        .bind(day_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(GatewayError::store)?;

        rows.into_iter()
            .map(|(id, day_id, time, capacity_time)| {
                Ok(TimeSlot {
                    id: SlotId::new(id),
                    day_id: DayId::new(day_id),
                    time: parse_time(&time)?,
                    capacity_time,
                })
            })
            .collect()
    }

    // ── Availability queries ────────────────────────────────────────────

    /// Lists days at or after `today` that contain at least one slot with
    /// remaining capacity >= `persons`, ordered by date ascending.
    ///
    /// Availability is slot-driven: a day whose slots are all full is
    /// excluded even when the stored day capacity has headroom. The
    /// returned `remaining` is the day-level display estimate.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn available_days(
        &self,
        persons: i64,
        today: NaiveDate,
    ) -> Result<Vec<DayAvailability>, GatewayError> {
        let rows: Vec<(i64, String, i64)> = sqlx::query_as(
            "SELECT
                d.id,
                d.date,
                d.capacity_day -
                    COALESCE((SELECT SUM(b.persons) FROM bookings b WHERE b.day_id = d.id), 0)
                    AS remaining
             FROM days d
             WHERE d.date >= ?1
               AND EXISTS (
                 SELECT 1 FROM time_slots ts
                 LEFT JOIN bookings b2 ON b2.time_slot_id = ts.id
                 WHERE ts.day_id = d.id
                 GROUP BY ts.id
                 HAVING ts.capacity_time - COALESCE(SUM(b2.persons), 0) >= ?2
               )
             ORDER BY d.date",
        )
        .bind(today.format(DATE_FMT).to_string())
        .bind(persons)
        .fetch_all(&self.pool)
        .await
        .map_err(GatewayError::store)?;

        rows.into_iter()
            .map(|(id, date, remaining)| {
                Ok(DayAvailability {
                    day_id: DayId::new(id),
                    date: parse_date(&date)?,
                    remaining,
                })
            })
            .collect()
    }

    /// Lists slots under `day_id` with remaining capacity >= `persons`,
    /// restricted to slots strictly in the future relative to `now`,
    /// ordered by time ascending.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn available_times(
        &self,
        day_id: DayId,
        persons: i64,
        now: NaiveDateTime,
    ) -> Result<Vec<SlotAvailability>, GatewayError> {
        let rows: Vec<(i64, String, i64)> = sqlx::query_as(
            "SELECT
                ts.id,
                ts.time,
                ts.capacity_time - COALESCE(SUM(b.persons), 0) AS remaining
             FROM time_slots ts
             JOIN days d ON d.id = ts.day_id
             LEFT JOIN bookings b ON b.time_slot_id = ts.id
             WHERE ts.day_id = ?1
             GROUP BY ts.id
             HAVING remaining >= ?2
                AND (d.date > ?3 OR (d.date = ?3 AND ts.time > ?4))
             ORDER BY ts.time",
        )
        .bind(day_id.get())
        .bind(persons)
        .bind(now.date().format(DATE_FMT).to_string())
        .bind(now.time().format(TIME_FMT).to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(GatewayError::store)?;

        rows.into_iter()
            .map(|(id, time, remaining)| {
                Ok(SlotAvailability {
                    time_slot_id: SlotId::new(id),
                    time: parse_time(&time)?,
                    remaining,
                })
            })
            .collect()
    }

    // ── Admission ───────────────────────────────────────────────────────

    /// Atomically admits a reservation or rejects it with a typed reason.
    ///
    /// Runs under `BEGIN IMMEDIATE`: the fresh capacity aggregate and the
    /// insert cannot interleave with another admission for any slot, so a
    /// slot is never oversold. Competing requests for the last seats are
    /// resolved first-committer-wins; there is no fairness ordering across
    /// identities.
    ///
    /// The transaction guard rolls back on drop, so a request future
    /// dropped mid-flight (client disconnect) never returns the
    /// connection to the pool with the write lock still held.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::SlotNotFound`] when the slot does not exist or
    ///   does not belong to `day_id`,
    /// - [`GatewayError::SlotFull`] when remaining capacity is below the
    ///   requested party size at commit time,
    /// - [`GatewayError::DuplicateBooking`] when the identity already
    ///   holds a booking,
    /// - [`GatewayError::Store`] on infrastructure failure.
    ///
    /// On any rejection the transaction is rolled back; no partial row is
    /// left behind.
    pub async fn reserve(
        &self,
        request: &ReservationRequest,
    ) -> Result<BookingConfirmation, GatewayError> {
        let mut conn = self.pool.acquire().await.map_err(GatewayError::store)?;
        let mut tx = conn
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(GatewayError::store)?;

        match Self::admit(&mut tx, request).await {
            Ok(confirmation) => {
                tx.commit().await.map_err(GatewayError::store)?;
                Ok(confirmation)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed after rejected admission");
                }
                Err(err)
            }
        }
    }

    /// Capacity re-check and insert, inside the caller's transaction.
    async fn admit(
        conn: &mut SqliteConnection,
        request: &ReservationRequest,
    ) -> Result<BookingConfirmation, GatewayError> {
        // Fresh aggregate over current bookings; the row is absent when
        // the slot id is stale or belongs to a different day.
        let remaining: Option<(i64,)> = sqlx::query_as(
            "SELECT ts.capacity_time - COALESCE(SUM(b.persons), 0) AS remaining
             FROM time_slots ts
             LEFT JOIN bookings b ON b.time_slot_id = ts.id
             WHERE ts.id = ?1 AND ts.day_id = ?2
             GROUP BY ts.id",
        )
        .bind(request.time_slot_id.get())
        .bind(request.day_id.get())
        .fetch_optional(&mut *conn)
        .await
        .map_err(GatewayError::store)?;

        let remaining = remaining
            .map(|(r,)| r)
            .ok_or(GatewayError::SlotNotFound(request.time_slot_id))?;

        if remaining < request.persons {
            return Err(GatewayError::SlotFull);
        }

        let inserted = sqlx::query(
            "INSERT INTO bookings
                (user_id, name, persons, day_id, time_slot_id, phone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(request.user_id.get())
        .bind(&request.name)
        .bind(request.persons)
        .bind(request.day_id.get())
        .bind(request.time_slot_id.get())
        .bind(request.phone.as_deref())
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *conn)
        .await;

        let inserted = match inserted {
            Ok(result) => result,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(GatewayError::DuplicateBooking);
            }
            Err(err) => return Err(GatewayError::store(err)),
        };

        let (date, time): (String, String) = sqlx::query_as(
            "SELECT d.date, ts.time
             FROM days d JOIN time_slots ts ON ts.id = ?2
             WHERE d.id = ?1",
        )
        .bind(request.day_id.get())
        .bind(request.time_slot_id.get())
        .fetch_one(&mut *conn)
        .await
        .map_err(GatewayError::store)?;

        Ok(BookingConfirmation {
            booking_id: BookingId::new(inserted.last_insert_rowid()),
            date: parse_date(&date)?,
            time: parse_time(&time)?,
        })
    }

    // ── Ledger reads ────────────────────────────────────────────────────

    /// Returns `true` when the identity holds an active booking.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn has_booking(&self, user_id: UserId) -> Result<bool, GatewayError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM bookings WHERE user_id = ?1 LIMIT 1")
                .bind(user_id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(GatewayError::store)?;
        Ok(row.is_some())
    }

    /// Fetches the identity's current booking, if any.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn booking_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<BookingDetails>, GatewayError> {
        let row: Option<DetailsRow> = sqlx::query_as(
            "SELECT b.id, b.user_id, b.name, b.phone, b.persons, d.date, ts.time, b.created_at
             FROM bookings b
             JOIN days d ON d.id = b.day_id
             JOIN time_slots ts ON ts.id = b.time_slot_id
             WHERE b.user_id = ?1",
        )
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(GatewayError::store)?;

        row.map(details_from_row).transpose()
    }

    /// Fetches one booking by id, joined with its day and slot.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn booking_by_id(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<BookingDetails>, GatewayError> {
        let row: Option<DetailsRow> = sqlx::query_as(
            "SELECT b.id, b.user_id, b.name, b.phone, b.persons, d.date, ts.time, b.created_at
             FROM bookings b
             JOIN days d ON d.id = b.day_id
             JOIN time_slots ts ON ts.id = b.time_slot_id
             WHERE b.id = ?1",
        )
        .bind(booking_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(GatewayError::store)?;

        row.map(details_from_row).transpose()
    }

    /// Lists every booking, ordered by date then time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn all_bookings(&self) -> Result<Vec<BookingDetails>, GatewayError> {
        let rows: Vec<DetailsRow> = sqlx::query_as(
            "SELECT b.id, b.user_id, b.name, b.phone, b.persons, d.date, ts.time, b.created_at
             FROM bookings b
             JOIN days d ON d.id = b.day_id
             JOIN time_slots ts ON ts.id = b.time_slot_id
             ORDER BY d.date, ts.time",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(GatewayError::store)?;

        rows.into_iter().map(details_from_row).collect()
    }

    /// Lists bookings for one date, ordered by time then creation.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn bookings_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<BookingDetails>, GatewayError> {
        let rows: Vec<DetailsRow> = sqlx::query_as(
            "SELECT b.id, b.user_id, b.name, b.phone, b.persons, d.date, ts.time, b.created_at
             FROM bookings b
             JOIN days d ON d.id = b.day_id
             JOIN time_slots ts ON ts.id = b.time_slot_id
             WHERE d.date = ?1
             ORDER BY ts.time, b.created_at",
        )
        .bind(date.format(DATE_FMT).to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(GatewayError::store)?;

        rows.into_iter().map(details_from_row).collect()
    }

    // ── Cancellation ────────────────────────────────────────────────────

    /// Deletes the identity's booking. Returns whether a row was removed.
    ///
    /// Single-statement atomic delete; capacity is freed implicitly since
    /// remaining seats are always re-aggregated.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn cancel_by_user(&self, user_id: UserId) -> Result<bool, GatewayError> {
        let result = sqlx::query("DELETE FROM bookings WHERE user_id = ?1")
            .bind(user_id.get())
            .execute(&self.pool)
            .await
            .map_err(GatewayError::store)?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes one booking by id. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn cancel_by_id(&self, booking_id: BookingId) -> Result<bool, GatewayError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?1")
            .bind(booking_id.get())
            .execute(&self.pool)
            .await
            .map_err(GatewayError::store)?;
        Ok(result.rows_affected() > 0)
    }

    // ── Reporting ───────────────────────────────────────────────────────

    /// Occupancy per upcoming day: `(date, booked, capacity_day)` for days
    /// at or after `today`, ordered by date.
    ///
    /// The denominator is the stored day capacity, which the seeding
    /// convention keeps equal to the slot sum but the core never enforces.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn stats_for_upcoming(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<DayStats>, GatewayError> {
        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            "SELECT d.date, d.capacity_day, COALESCE(SUM(b.persons), 0) AS booked
             FROM days d
             LEFT JOIN bookings b ON b.day_id = d.id
             WHERE d.date >= ?1
             GROUP BY d.id
             ORDER BY d.date",
        )
        .bind(today.format(DATE_FMT).to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(GatewayError::store)?;

        rows.into_iter()
            .map(|(date, capacity_day, booked)| {
                Ok(DayStats {
                    date: parse_date(&date)?,
                    booked,
                    capacity_day,
                })
            })
            .collect()
    }

    // ── Reminders ───────────────────────────────────────────────────────

    /// Bookings with an unsent reminder whose excursion datetime falls in
    /// the `[from, to]` window.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn pending_reminders(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<PendingReminder>, GatewayError> {
        let rows: Vec<(i64, i64, i64, String, String)> = sqlx::query_as(
            "SELECT b.id, b.user_id, b.persons, d.date, ts.time
             FROM bookings b
             JOIN days d ON d.id = b.day_id
             JOIN time_slots ts ON ts.id = b.time_slot_id
             WHERE b.reminder_sent = 0
               AND datetime(d.date || ' ' || ts.time) BETWEEN datetime(?1) AND datetime(?2)",
        )
        .bind(from.format(DATETIME_FMT).to_string())
        .bind(to.format(DATETIME_FMT).to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(GatewayError::store)?;

        rows.into_iter()
            .map(|(id, user_id, persons, date, time)| {
                Ok(PendingReminder {
                    booking_id: BookingId::new(id),
                    user_id: UserId::new(user_id),
                    persons,
                    date: parse_date(&date)?,
                    time: parse_time(&time)?,
                })
            })
            .collect()
    }

    /// Flips the booking's reminder flag to sent. Monotonic; never unset.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn mark_reminder_sent(&self, booking_id: BookingId) -> Result<(), GatewayError> {
        sqlx::query("UPDATE bookings SET reminder_sent = 1 WHERE id = ?1")
            .bind(booking_id.get())
            .execute(&self.pool)
            .await
            .map_err(GatewayError::store)?;
        Ok(())
    }
}

type DetailsRow = (
    i64,
    i64,
    String,
    Option<String>,
    i64,
    String,
    String,
    String,
);

fn details_from_row(row: DetailsRow) -> Result<BookingDetails, GatewayError> {
    let (id, user_id, name, phone, persons, date, time, created_at) = row;
    Ok(BookingDetails {
        id: BookingId::new(id),
        user_id: UserId::new(user_id),
        name,
        phone,
        persons,
        date: parse_date(&date)?,
        time: parse_time(&time)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate, GatewayError> {
    NaiveDate::parse_from_str(raw, DATE_FMT)
        .map_err(|e| GatewayError::Internal(format!("malformed stored date {raw:?}: {e}")))
}

fn parse_time(raw: &str) -> Result<NaiveTime, GatewayError> {
    NaiveTime::parse_from_str(raw, TIME_FMT)
        .map_err(|e| GatewayError::Internal(format!("malformed stored time {raw:?}: {e}")))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, GatewayError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| GatewayError::Internal(format!("malformed stored timestamp {raw:?}: {e}")))
}
