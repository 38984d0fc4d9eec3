//! Booking service: validation, orchestration, and notification emission.

use chrono::Local;

use crate::domain::validate::{normalize_phone, valid_name};
use crate::domain::{
    BookingConfirmation, BookingDetails, BookingId, DayAvailability, DayId, DayStats, Notification,
    NotificationBus, NotificationKind, ReservationRequest, ScheduleRule, SlotAvailability, UserId,
};
use crate::error::GatewayError;
use crate::persistence::store::BookingStore;

/// Orchestration layer for all booking operations.
///
/// Stateless coordinator: owns a clone of the [`BookingStore`] for
/// durable state and the [`NotificationBus`] for outbound payloads.
/// Input validation happens here so the store only ever sees normalized
/// tuples; admission-time invariants (capacity, identity uniqueness) are
/// re-checked inside the store's transaction regardless.
#[derive(Debug, Clone)]
pub struct BookingService {
    store: BookingStore,
    notifications: NotificationBus,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(store: BookingStore, notifications: NotificationBus) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Returns a reference to the inner [`NotificationBus`].
    #[must_use]
    pub fn notifications(&self) -> &NotificationBus {
        &self.notifications
    }

    // ── Availability ────────────────────────────────────────────────────

    /// Days from today onward with at least one slot fitting `persons`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for a non-positive party
    /// size, or [`GatewayError::Store`] on database failure.
    pub async fn available_days(&self, persons: i64) -> Result<Vec<DayAvailability>, GatewayError> {
        check_party_size(persons)?;
        self.store
            .available_days(persons, Local::now().date_naive())
            .await
    }

    /// Future slots under `day_id` fitting `persons`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for a non-positive party
    /// size, [`GatewayError::DayNotFound`] for an unknown day, or
    /// [`GatewayError::Store`] on database failure.
    pub async fn available_times(
        &self,
        day_id: DayId,
        persons: i64,
    ) -> Result<Vec<SlotAvailability>, GatewayError> {
        check_party_size(persons)?;
        if self.store.get_day(day_id).await?.is_none() {
            return Err(GatewayError::DayNotFound(day_id));
        }
        self.store
            .available_times(day_id, persons, Local::now().naive_local())
            .await
    }

    // ── Admission ───────────────────────────────────────────────────────

    /// Validates and admits a reservation.
    ///
    /// The name must be a displayable booking name and the phone, when
    /// given, must normalize to `+<countrycode><subscriber>`. The
    /// capacity and identity-uniqueness checks run inside the store's
    /// exclusive transaction; see
    /// [`BookingStore::reserve`](crate::persistence::store::BookingStore::reserve).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on malformed input, or
    /// any admission rejection from the store.
    pub async fn reserve(
        &self,
        mut request: ReservationRequest,
    ) -> Result<BookingConfirmation, GatewayError> {
        check_party_size(request.persons)?;
        if !valid_name(&request.name) {
            return Err(GatewayError::InvalidRequest(
                "name must be 2-50 characters of letters, spaces, or hyphens".to_string(),
            ));
        }
        if let Some(raw) = request.phone.take() {
            let normalized = normalize_phone(&raw).ok_or_else(|| {
                GatewayError::InvalidRequest(format!("invalid phone number: {raw}"))
            })?;
            request.phone = Some(normalized);
        }

        let confirmation = self.store.reserve(&request).await?;
        tracing::info!(
            user = %request.user_id,
            booking = %confirmation.booking_id,
            persons = request.persons,
            date = %confirmation.date,
            time = %confirmation.time,
            "booking created"
        );
        Ok(confirmation)
    }

    // ── Lookup and cancellation ─────────────────────────────────────────

    /// The identity's current booking.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NoActiveBooking`] when the identity holds
    /// no booking, or [`GatewayError::Store`] on database failure.
    pub async fn booking_for_user(&self, user_id: UserId) -> Result<BookingDetails, GatewayError> {
        self.store
            .booking_for_user(user_id)
            .await?
            .ok_or(GatewayError::NoActiveBooking(user_id))
    }

    /// Self-service cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NoActiveBooking`] when there was nothing
    /// to cancel, or [`GatewayError::Store`] on database failure.
    pub async fn cancel_by_user(&self, user_id: UserId) -> Result<(), GatewayError> {
        if !self.store.cancel_by_user(user_id).await? {
            return Err(GatewayError::NoActiveBooking(user_id));
        }
        tracing::info!(user = %user_id, "booking cancelled by user");
        Ok(())
    }

    /// Administrative cancellation with out-of-band user notice.
    ///
    /// The affected identity receives a cancellation payload on the
    /// notification bus. A missing delivery channel is logged at error
    /// severity and never fails the cancellation; the row is already
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] for an unknown id, or
    /// [`GatewayError::Store`] on database failure.
    pub async fn cancel_by_id(&self, booking_id: BookingId) -> Result<(), GatewayError> {
        let details = self
            .store
            .booking_by_id(booking_id)
            .await?
            .ok_or(GatewayError::BookingNotFound(booking_id))?;

        if !self.store.cancel_by_id(booking_id).await? {
            // Lost a race with another delete between lookup and here.
            return Err(GatewayError::BookingNotFound(booking_id));
        }
        tracing::info!(booking = %booking_id, user = %details.user_id, "booking cancelled by admin");

        let delivered = self.notifications.publish(Notification {
            user_id: details.user_id,
            kind: NotificationKind::AdminCancelled,
            message: format!(
                "Your excursion booking on {} at {} was cancelled by the administrator. \
                 You are welcome to book again.",
                details.date,
                details.time.format("%H:%M"),
            ),
        });
        if delivered == 0 {
            tracing::error!(
                user = %details.user_id,
                booking = %booking_id,
                "no delivery channel attached for cancellation notice"
            );
        }
        Ok(())
    }

    // ── Reporting and seeding ───────────────────────────────────────────

    /// Occupancy per upcoming day for the admin views.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn stats_for_upcoming(&self) -> Result<Vec<DayStats>, GatewayError> {
        self.store
            .stats_for_upcoming(Local::now().date_naive())
            .await
    }

    /// Bookings for one date, for the admin views.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn bookings_for_date(
        &self,
        date: chrono::NaiveDate,
    ) -> Result<Vec<BookingDetails>, GatewayError> {
        self.store.bookings_for_date(date).await
    }

    /// Every booking, for the admin views.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn all_bookings(&self) -> Result<Vec<BookingDetails>, GatewayError> {
        self.store.all_bookings().await
    }

    /// Destructive schedule replace; see
    /// [`BookingStore::replace_schedule`](crate::persistence::store::BookingStore::replace_schedule).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for empty rules or
    /// non-positive capacities, or [`GatewayError::Store`] on database
    /// failure.
    pub async fn replace_schedule(&self, rules: &[ScheduleRule]) -> Result<(), GatewayError> {
        if rules.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "schedule must contain at least one day".to_string(),
            ));
        }
        for rule in rules {
            if rule.slots.is_empty() {
                return Err(GatewayError::InvalidRequest(format!(
                    "day {} has no time slots",
                    rule.date
                )));
            }
            if rule.slots.iter().any(|s| s.capacity < 0)
                || rule.capacity_day.is_some_and(|c| c < 0)
            {
                return Err(GatewayError::InvalidRequest(format!(
                    "day {} has a negative capacity",
                    rule.date
                )));
            }
        }
        self.store.replace_schedule(rules).await?;
        tracing::info!(days = rules.len(), "schedule replaced");
        Ok(())
    }
}

fn check_party_size(persons: i64) -> Result<(), GatewayError> {
    if persons < 1 {
        return Err(GatewayError::InvalidRequest(
            "party size must be at least 1".to_string(),
        ));
    }
    Ok(())
}
