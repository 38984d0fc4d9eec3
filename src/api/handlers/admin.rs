//! Admin handlers: occupancy reporting, booking management, seeding.
//!
//! These are read queries over the same store the booking flow writes,
//! so the chat admin panel and any HTTP admin view show identical
//! numbers at query time. Authentication is a deployment concern
//! (reverse proxy), not part of the core.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, put};
use axum::{Json, Router};

use crate::api::dto::{
    BookingDto, BookingsFilterParams, DayStatsDto, ReplaceScheduleRequest, ReplaceScheduleResponse,
    ScheduleDayDto,
};
use crate::app_state::AppState;
use crate::domain::{BookingId, ScheduleRule};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /admin/stats` — Occupancy per upcoming day.
///
/// # Errors
///
/// Returns [`GatewayError::Store`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    tag = "Admin",
    summary = "Upcoming occupancy",
    description = "Returns booked seats, stored day capacity, and the derived percentage for every upcoming day, ordered by date.",
    responses(
        (status = 200, description = "Occupancy rows", body = Vec<DayStatsDto>),
    )
)]
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    let rows = state.booking_service.stats_for_upcoming().await?;
    let data: Vec<DayStatsDto> = rows.into_iter().map(DayStatsDto::from).collect();
    Ok(Json(data))
}

/// `GET /admin/bookings?date=YYYY-MM-DD` — Booking listing.
///
/// With `date`, lists that day's bookings ordered by time then creation;
/// without it, lists everything ordered by date then time.
///
/// # Errors
///
/// Returns [`GatewayError::Store`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/bookings",
    tag = "Admin",
    summary = "List bookings",
    description = "Returns booking summaries, optionally restricted to a single date via the `date` query parameter.",
    responses(
        (status = 200, description = "Booking summaries", body = Vec<BookingDto>),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<BookingsFilterParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let rows = match params.date {
        Some(date) => state.booking_service.bookings_for_date(date).await?,
        None => state.booking_service.all_bookings().await?,
    };
    let data: Vec<BookingDto> = rows.into_iter().map(BookingDto::from).collect();
    Ok(Json(data))
}

/// `DELETE /admin/bookings/:id` — Administrative cancellation.
///
/// The affected identity is notified through the delivery feed; a
/// missing delivery channel never fails the cancellation.
///
/// # Errors
///
/// Returns [`GatewayError::BookingNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/bookings/{id}",
    tag = "Admin",
    summary = "Cancel a booking",
    description = "Deletes the booking and emits a cancellation notice for the affected identity on the notification feed.",
    responses(
        (status = 204, description = "Booking cancelled"),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .booking_service
        .cancel_by_id(BookingId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /admin/schedule` — Destructive schedule replace.
///
/// Full-table reset followed by bulk insert, never a merge. Must be run
/// while no reservations are being taken; a reset that would orphan
/// existing bookings fails outright.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for malformed rules, or
/// [`GatewayError::Store`] when bookings still reference the schedule.
#[utoipa::path(
    put,
    path = "/api/v1/admin/schedule",
    tag = "Admin",
    summary = "Replace the schedule",
    description = "Replaces the entire future schedule with the given days and slots. Existing bookings keep referential integrity, so a replace with live bookings is rejected.",
    request_body = ReplaceScheduleRequest,
    responses(
        (status = 200, description = "Schedule seeded", body = ReplaceScheduleResponse),
        (status = 400, description = "Malformed rules", body = ErrorResponse),
    )
)]
pub async fn replace_schedule(
    State(state): State<AppState>,
    Json(req): Json<ReplaceScheduleRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let rules = req
        .days
        .into_iter()
        .map(ScheduleDayDto::into_rule)
        .collect::<Result<Vec<ScheduleRule>, GatewayError>>()?;

    state.booking_service.replace_schedule(&rules).await?;

    let time_slots = rules.iter().map(|r| r.slots.len()).sum();
    Ok(Json(ReplaceScheduleResponse {
        days: rules.len(),
        time_slots,
    }))
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(stats))
        .route("/admin/bookings", get(list_bookings))
        .route("/admin/bookings/{id}", delete(cancel_booking))
        .route("/admin/schedule", put(replace_schedule))
}
